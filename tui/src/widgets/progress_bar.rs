//! ProgressBar Widget
//!
//! A one-row bar: filled cells fade from cyan to pink, the rest of the track
//! is drawn with `░`.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::theme::{gradient, NEON_CYAN, NEON_PINK, TRACK_GRAY};

const FILLED: &str = "█";
const TRACK: &str = "░";

/// Loading bar for a percentage in `[0, 100]`
pub struct ProgressBar {
    percent: u8,
}

impl ProgressBar {
    pub fn new(percent: u8) -> Self {
        Self {
            percent: percent.min(100),
        }
    }

    /// Number of filled cells for a bar `width` cells wide
    pub fn filled_cells(&self, width: u16) -> u16 {
        (u32::from(width) * u32::from(self.percent) / 100) as u16
    }
}

impl Widget for ProgressBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let filled = self.filled_cells(area.width);
        let span = area.width.saturating_sub(1).max(1) as f32;

        for offset in 0..area.width {
            let x = area.x + offset;
            let Some(cell) = buf.cell_mut((x, area.y)) else {
                continue;
            };

            if offset < filled {
                let color = gradient(NEON_CYAN, NEON_PINK, offset as f32 / span);
                cell.set_symbol(FILLED).set_style(Style::default().fg(color));
            } else {
                cell.set_symbol(TRACK)
                    .set_style(Style::default().fg(TRACK_GRAY));
            }
        }
    }
}
