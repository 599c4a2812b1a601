//! NoticeToast Widget
//!
//! Bordered toast drawn on top of the hero panel. Clears what is beneath it.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

use crate::display::{Notice, NoticeKind};
use crate::theme::{NEON_CYAN, NOTICE_SUCCESS, TEXT_LIGHT};

/// Widest a toast gets, borders included
const MAX_WIDTH: u16 = 48;

pub struct NoticeToast<'a> {
    notice: &'a Notice,
}

impl<'a> NoticeToast<'a> {
    pub fn new(notice: &'a Notice) -> Self {
        Self { notice }
    }

    /// Bottom-right placement inside `area`
    pub fn placement(&self, area: Rect) -> Rect {
        let width = MAX_WIDTH.min(area.width);
        let inner_width = width.saturating_sub(2).max(1) as usize;
        let body_lines = textwrap::wrap(&self.notice.body, inner_width).len() as u16;
        let height = (body_lines + 3).min(area.height);

        Rect::new(
            area.x + area.width - width,
            area.y + area.height - height,
            width,
            height,
        )
    }
}

impl Widget for NoticeToast<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let accent = match self.notice.kind {
            NoticeKind::Success => NOTICE_SUCCESS,
            NoticeKind::Info => NEON_CYAN,
        };
        let rect = self.placement(area);

        Clear.render(rect, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent));

        let lines = vec![
            Line::from(Span::styled(
                self.notice.title.as_str(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.notice.body.as_str(),
                Style::default().fg(TEXT_LIGHT),
            )),
        ];

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(rect, buf);
    }
}
