//! Dashboard device table: latest readings per device.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::ui::theme::{HEADER_FG, OFFLINE, ONLINE, ROW_HIGHLIGHT, UNKNOWN};
use crate::views::DeviceRow;

const COLS: [Constraint; 7] = [
    Constraint::Percentage(26), // Name
    Constraint::Length(10),     // Vendor
    Constraint::Length(16),     // IP
    Constraint::Length(7),      // CPU
    Constraint::Length(7),      // Mem
    Constraint::Length(8),      // Temp
    Constraint::Length(8),      // Status
];

pub fn draw_device_table(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    rows: &[DeviceRow],
    selected: usize,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Devices  (Enter detail · r refresh · a add · d delete · s settings)");
    if rows.is_empty() {
        f.render_widget(
            Paragraph::new("No devices").style(Style::default().fg(UNKNOWN)).block(block),
            area,
        );
        return;
    }

    let body = rows.iter().map(|r| {
        let status_fg = match r.status {
            "online" => ONLINE,
            "offline" => OFFLINE,
            _ => UNKNOWN,
        };
        Row::new(vec![
            Cell::from(r.name.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(r.vendor.clone()),
            Cell::from(r.ip.clone()),
            Cell::from(r.cpu.clone()),
            Cell::from(r.memory.clone()),
            Cell::from(r.temperature.clone()),
            Cell::from(r.status).style(Style::default().fg(status_fg)),
        ])
    });
    let header = Row::new(vec!["Name", "Vendor", "IP", "CPU", "Mem", "Temp", "Status"]).style(
        Style::default()
            .fg(HEADER_FG)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(body, COLS.to_vec())
        .header(header)
        .block(block)
        .column_spacing(1)
        .highlight_style(Style::default().bg(ROW_HIGHLIGHT));
    let mut state = TableState::default().with_selected(Some(selected.min(rows.len() - 1)));
    f.render_stateful_widget(table, area, &mut state);
}
