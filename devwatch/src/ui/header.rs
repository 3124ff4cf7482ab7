//! Top header: tabs, backend, device counts and refresh status.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::settings::{fmt_interval, RefreshConfig};
use crate::ui::theme::{OFFLINE, ONLINE};
use crate::ui::util::truncate_middle;
use crate::views::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Devices,
    /// Single-device view, opened from either table.
    Detail,
}

pub struct HeaderInfo<'a> {
    pub tab: Tab,
    pub backend: &'a str,
    pub summary: Option<Summary>,
    pub updated: Option<&'a str>,
    pub error: Option<&'a str>,
    pub config: RefreshConfig,
    pub polling: bool,
}

fn tab_span(label: &str, active: bool) -> Span<'static> {
    if active {
        Span::styled(
            format!(" {label} "),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(format!(" {label} "))
    }
}

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, h: &HeaderInfo<'_>) {
    let max_url = (area.width as usize).saturating_sub(40).max(12);
    let mut title = vec![
        Span::styled("devwatch", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" @ {}  ", truncate_middle(h.backend, max_url))),
        tab_span("1 Dashboard", h.tab == Tab::Dashboard),
        Span::raw(" "),
        tab_span("2 Devices", h.tab == Tab::Devices),
    ];
    if h.tab == Tab::Detail {
        title.push(Span::raw(" "));
        title.push(tab_span("Detail", true));
    }
    let title = Line::from(title);

    let mut status: Vec<Span> = Vec::new();
    match h.summary {
        Some(s) => {
            status.push(Span::raw(format!("devices: {}  ", s.total)));
            status.push(Span::styled(
                format!("online: {}  ", s.online),
                Style::default().fg(ONLINE),
            ));
            status.push(Span::styled(
                format!("offline: {}", s.offline),
                Style::default().fg(OFFLINE),
            ));
        }
        None => status.push(Span::raw("connecting...")),
    }
    if let Some(t) = h.updated {
        status.push(Span::raw(format!("  | updated {t}")));
    }
    let cadence = if h.polling {
        format!(
            "  | chart {} / table {}",
            fmt_interval(h.config.fast_interval_ms),
            fmt_interval(h.config.slow_interval_ms)
        )
    } else {
        "  | polling paused".into()
    };
    status.push(Span::styled(cadence, Style::default().fg(Color::DarkGray)));
    if let Some(e) = h.error {
        status.push(Span::styled(
            format!("  | stale: {e}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let p = Paragraph::new(vec![title, Line::from(status)])
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(p, area);
}
