//! Devices tab: the backend inventory with multi-select for bulk delete.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::ui::theme::{HEADER_FG, MARKED, ROW_HIGHLIGHT, UNKNOWN};
use crate::views::InventoryRow;

const COLS: [Constraint; 5] = [
    Constraint::Length(3),      // mark
    Constraint::Percentage(30), // Name
    Constraint::Length(10),     // Vendor
    Constraint::Length(22),     // Address
    Constraint::Length(14),     // User
];

pub fn draw_inventory(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    rows: Option<&[InventoryRow]>,
    selected: usize,
) {
    let marked = rows.map(|r| r.iter().filter(|x| x.selected).count()).unwrap_or(0);
    let block = Block::default().borders(Borders::ALL).title(format!(
        "Inventory ({marked} selected)  (space select · A all · e edit · d delete · Enter detail · r reload)"
    ));
    let rows = match rows {
        None => {
            f.render_widget(Paragraph::new("Loading...").block(block), area);
            return;
        }
        Some(r) if r.is_empty() => {
            f.render_widget(
                Paragraph::new("No devices").style(Style::default().fg(UNKNOWN)).block(block),
                area,
            );
            return;
        }
        Some(r) => r,
    };

    let body = rows.iter().map(|r| {
        let mark = if r.selected { "[x]" } else { "[ ]" };
        let style = if r.selected {
            Style::default().fg(MARKED)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(mark),
            Cell::from(r.name.clone()),
            Cell::from(r.vendor.clone()),
            Cell::from(r.address.clone()),
            Cell::from(r.username.clone()),
        ])
        .style(style)
    });
    let header = Row::new(vec!["", "Name", "Vendor", "Address", "User"]).style(
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
