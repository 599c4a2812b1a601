//! Hero Terminal
//!
//! The NEXUS.TERMINAL panel: a bordered window with three header lights.
//! While booting it shows the progress bar and boot log; once loaded it shows
//! the gradient headline, the typed status line with its cursor, and the two
//! action buttons. A one-line status bar sits under the panel.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::actions::HeroAction;
use crate::display::DisplayState;
use crate::theme::{
    gradient, BORDER_CYAN, LOG_GRAY, NEON_CYAN, NEON_PINK, NEON_PINK_DEEP, NEON_YELLOW,
    TEXT_GRAY, TEXT_LIGHT,
};
use crate::widgets::{NoticeToast, ProgressBar};

/// Widest the panel gets on large terminals
const PANEL_MAX_WIDTH: u16 = 84;

const CURSOR: &str = "█";

/// Full-screen hero view
pub struct HeroTerminal<'a> {
    display: &'a DisplayState,
}

impl<'a> HeroTerminal<'a> {
    pub fn new(display: &'a DisplayState) -> Self {
        Self { display }
    }

    /// Where the panel sits inside the frame (status bar excluded)
    pub fn panel_area(area: Rect) -> Rect {
        let width = area.width.min(PANEL_MAX_WIDTH);
        let height = area.height.saturating_sub(1);
        Rect::new(area.x + (area.width - width) / 2, area.y, width, height)
    }

    fn block(&self) -> Block<'a> {
        let title = Line::from(vec![
            Span::styled(" ▣ ", Style::default().fg(NEON_CYAN)),
            Span::styled(
                self.display.title.clone(),
                Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ]);
        let lights = Line::from(vec![
            Span::styled("●", Style::default().fg(NEON_PINK_DEEP)),
            Span::raw(" "),
            Span::styled("●", Style::default().fg(NEON_YELLOW)),
            Span::raw(" "),
            Span::styled("●", Style::default().fg(NEON_CYAN)),
            Span::raw(" "),
        ])
        .right_aligned();

        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_CYAN))
            .title(title)
            .title(lights)
    }

    fn render_loading(&self, area: Rect, buf: &mut Buffer) {
        let [header, _, bar, _, log] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        Paragraph::new(Line::from(vec![
            Span::styled("[SYSTEM] ", Style::default().fg(NEON_CYAN)),
            Span::styled(
                "Initializing neural interface...",
                Style::default().fg(TEXT_GRAY),
            ),
        ]))
        .render(header, buf);

        let progress = self.display.snapshot.loading_progress;
        let [track, percent] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(5)]).areas(bar);
        ProgressBar::new(progress).render(track, buf);
        Paragraph::new(format!("{progress:>4}%"))
            .style(Style::default().fg(NEON_CYAN))
            .render(percent, buf);

        let lines: Vec<Line> = self
            .display
            .boot_log
            .iter()
            .map(|line| Line::styled(line.as_str(), Style::default().fg(LOG_GRAY)))
            .collect();
        Paragraph::new(lines).render(log, buf);
    }

    fn render_loaded(&self, area: Rect, buf: &mut Buffer) {
        let width = area.width.max(1) as usize;
        let mut lines = vec![Line::default(), self.headline_line(), Line::default()];
        lines.extend(self.status_lines(width));
        lines.push(Line::default());
        lines.extend(self.button_lines(width));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn headline_line(&self) -> Line<'a> {
        let chars: Vec<char> = self.display.headline.chars().collect();
        let span = chars.len().saturating_sub(1).max(1) as f32;
        let spans: Vec<Span> = chars
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let color = gradient(NEON_CYAN, NEON_PINK, i as f32 / span);
                Span::styled(
                    c.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )
            })
            .collect();
        Line::from(spans)
    }

    /// Typed text wrapped to `width`, cursor on the last row
    fn status_lines(&self, width: usize) -> Vec<Line<'a>> {
        let snapshot = &self.display.snapshot;
        let text_style = Style::default().fg(TEXT_LIGHT);

        let mut rows: Vec<String> = textwrap::wrap(&snapshot.displayed_text, width)
            .into_iter()
            .map(|row| row.into_owned())
            .collect();
        if rows.is_empty() {
            rows.push(String::new());
        }

        let last = rows.len() - 1;
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                let mut spans = vec![Span::styled(row, text_style)];
                if i == last {
                    // Keep the slot when hidden so centering doesn't jitter.
                    let cursor = if snapshot.show_cursor() { CURSOR } else { " " };
                    spans.push(Span::styled(cursor, Style::default().fg(NEON_CYAN)));
                }
                Line::from(spans)
            })
            .collect()
    }

    fn button_lines(&self, width: usize) -> Vec<Line<'a>> {
        let buttons: Vec<Span> = HeroAction::ALL
            .iter()
            .map(|action| {
                let color = match action {
                    HeroAction::AccessDataVault => NEON_CYAN,
                    HeroAction::EstablishConnection => NEON_PINK,
                };
                Span::styled(
                    format!("[ {} ({}) ]", action.label(), action.key()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )
            })
            .collect();

        let row_width: usize = buttons.iter().map(|b| b.content.width()).sum::<usize>() + 2;
        if row_width <= width {
            let mut row = Vec::with_capacity(3);
            let mut iter = buttons.into_iter();
            if let Some(first) = iter.next() {
                row.push(first);
            }
            for button in iter {
                row.push(Span::raw("  "));
                row.push(button);
            }
            vec![Line::from(row)]
        } else {
            buttons.into_iter().map(Line::from).collect()
        }
    }

    fn render_status_bar(&self, area: Rect, buf: &mut Buffer) {
        let hint = if self.display.is_loaded() {
            " v vault · c connect · r reboot · q quit "
        } else {
            " r reboot · q quit "
        };
        Paragraph::new(Line::from(vec![
            Span::styled(hint, Style::default().fg(TEXT_GRAY)),
            Span::styled(
                format!("│ {}", self.display.status_line()),
                Style::default().fg(LOG_GRAY),
            ),
        ]))
        .render(area, buf);
    }
}

impl Widget for HeroTerminal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let panel = Self::panel_area(area);
        let status = Rect::new(area.x, area.bottom() - 1, area.width, 1);

        let block = self.block();
        let inner = block.inner(panel);
        block.render(panel, buf);

        let content = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height,
        );
        if self.display.is_loaded() {
            self.render_loaded(content, buf);
        } else {
            self.render_loading(content, buf);
        }

        if let Some(notice) = &self.display.notice {
            NoticeToast::new(notice).render(inner, buf);
        }

        self.render_status_bar(status, buf);
    }
}
