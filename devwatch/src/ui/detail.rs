//! Device detail view: identity fields, per-device charts and the interface table.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::ui::chart::ChartAdapter;
use crate::ui::theme::{HEADER_FG, OFFLINE, ONLINE, UNKNOWN};
use crate::views::InterfaceRow;

pub struct DetailView<'a> {
    pub fields: Option<&'a [(&'static str, String)]>,
    pub interfaces: &'a [InterfaceRow],
    pub cpu: &'a ChartAdapter,
    pub memory: &'a ChartAdapter,
}

pub fn draw_detail(f: &mut ratatui::Frame<'_>, area: Rect, v: &DetailView<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Percentage(50),
            Constraint::Min(4),
        ])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Device  (Esc/b back · r refresh)");
    let Some(fields) = v.fields else {
        f.render_widget(Paragraph::new("Loading...").block(block), rows[0]);
        return;
    };
    let mut spans: Vec<Span> = Vec::with_capacity(fields.len() * 2);
    for (label, value) in fields {
        spans.push(Span::styled(
            format!("{label}: "),
            Style::default().fg(HEADER_FG),
        ));
        let style = match (*label, value.as_str()) {
            ("Status", "online") => Style::default().fg(ONLINE),
            ("Status", "offline") => Style::default().fg(OFFLINE),
            _ => Style::default().add_modifier(Modifier::BOLD),
        };
        spans.push(Span::styled(format!("{value}   "), style));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .block(block),
        rows[0],
    );

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    v.cpu.draw(f, charts[0]);
    v.memory.draw(f, charts[1]);

    let block = Block::default().borders(Borders::ALL).title("Interfaces");
    if v.interfaces.is_empty() {
        f.render_widget(
            Paragraph::new("No interface information")
                .style(Style::default().fg(UNKNOWN))
                .block(block),
            rows[2],
        );
        return;
    }
    let body = v.interfaces.iter().map(|i| {
        Row::new(vec![
            Cell::from(i.name.clone()),
            Cell::from(i.status).style(Style::default().fg(if i.up { ONLINE } else { OFFLINE })),
            Cell::from(i.speed.clone()),
            Cell::from(i.description.clone()),
        ])
    });
    let header = Row::new(vec!["Interface", "Status", "Speed", "Description"]).style(
        Style::default()
            .fg(HEADER_FG)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(
        body,
        [
            Constraint::Percentage(30),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .column_spacing(1);
    f.render_widget(table, rows[2]);
}
