//! Transient notices and the yes/no confirmation popup.

use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::util::centered_rect;

pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl NoticeLevel {
    fn color(self) -> Color {
        match self {
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Danger => Color::Red,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    shown_at: Instant,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_TTL
    }
}

/// One-line footer: the current notice, or key hints.
pub fn draw_footer(f: &mut ratatui::Frame<'_>, area: Rect, notice: Option<&Notice>, hints: &str) {
    let line = match notice {
        Some(n) => Line::from(vec![
            Span::styled(
                format!(" {} ", n.text),
                Style::default()
                    .fg(Color::Black)
                    .bg(n.level.color())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (x dismiss)", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(hints.to_string(), Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(line), area);
}

pub fn draw_confirm(f: &mut ratatui::Frame<'_>, area: Rect, question: &str) {
    let popup = centered_rect(50, 6, area);
    f.render_widget(Clear, popup);
    let lines = vec![
        Line::from(question.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "y confirm · any other key cancels",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Confirm"),
        );
    f.render_widget(p, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_after_ttl() {
        let n = Notice::new(NoticeLevel::Success, "saved");
        assert!(!n.expired(n.shown_at));
        assert!(!n.expired(n.shown_at + Duration::from_millis(2_999)));
        assert!(n.expired(n.shown_at + NOTICE_TTL));
    }
}
