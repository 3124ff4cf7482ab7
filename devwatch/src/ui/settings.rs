//! Refresh settings dialog: pick chart and table cadences from presets.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::settings::{cycle_preset, fmt_interval, RefreshConfig, FAST_PRESETS_MS, SLOW_PRESETS_MS};
use crate::ui::util::centered_rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    Pending,
    Save(RefreshConfig),
    Cancel,
}

#[derive(Debug, Clone)]
pub struct SettingsDialog {
    draft: RefreshConfig,
    focus: usize,
}

impl SettingsDialog {
    pub fn new(current: RefreshConfig) -> Self {
        Self {
            draft: current,
            focus: 0,
        }
    }

    pub fn draft(&self) -> RefreshConfig {
        self.draft
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SettingsAction {
        match key.code {
            KeyCode::Esc => return SettingsAction::Cancel,
            KeyCode::Enter => return SettingsAction::Save(self.draft),
            KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
                self.focus = 1 - self.focus
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                if self.focus == 0 {
                    self.draft.fast_interval_ms =
                        cycle_preset(&FAST_PRESETS_MS, self.draft.fast_interval_ms, forward);
                } else {
                    self.draft.slow_interval_ms =
                        cycle_preset(&SLOW_PRESETS_MS, self.draft.slow_interval_ms, forward);
                }
            }
            _ => {}
        }
        SettingsAction::Pending
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let popup = centered_rect(46, 7, area);
        f.render_widget(Clear, popup);
        let row = |i: usize, label: &str, ms: u64| {
            let style = if i == self.focus {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(format!("{label:<16}")),
                Span::styled(format!("◀ {:^7} ▶", fmt_interval(ms)), style),
            ])
        };
        let lines = vec![
            row(0, "Chart refresh", self.draft.fast_interval_ms),
            row(1, "Table refresh", self.draft.slow_interval_ms),
            Line::from(""),
            Line::from(Span::styled(
                "←/→ change · ↑/↓ field · Enter save · Esc cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let p = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Refresh settings"));
        f.render_widget(p, popup);
    }
}
