//! Add / edit device dialog: field editing, validation and drawing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::types::{DeviceUpdate, InventoryDevice, NewDevice};
use crate::ui::util::centered_rect;

const LABELS: [&str; 6] = ["Name", "Vendor", "IP", "Port", "Username", "Password"];
const NAME: usize = 0;
const VENDOR: usize = 1;
const IP: usize = 2;
const PORT: usize = 3;
const USER: usize = 4;
const PASS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    Pending,
    Submit(NewDevice),
    Update { id: String, update: DeviceUpdate },
    Invalid(String),
    Cancel,
}

#[derive(Debug, Clone)]
pub struct DeviceForm {
    values: [String; 6],
    focus: usize,
    // Id of the device being edited; None when adding.
    editing: Option<String>,
}

impl Default for DeviceForm {
    fn default() -> Self {
        let mut values: [String; 6] = Default::default();
        values[PORT] = "22".into();
        Self {
            values,
            focus: NAME,
            editing: None,
        }
    }
}

impl DeviceForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-filled from an inventory entry. The password starts blank and is only sent if typed.
    pub fn edit(device: &InventoryDevice) -> Self {
        let mut form = Self::default();
        form.values[NAME] = device.name.clone();
        form.values[VENDOR] = device.vendor.clone();
        form.values[IP] = device.ip.clone();
        form.values[PORT] = device.port.to_string();
        form.values[USER] = device.username.clone();
        form.editing = Some(device.id.clone());
        form
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % LABELS.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + LABELS.len() - 1) % LABELS.len()
            }
            KeyCode::Backspace => {
                self.values[self.focus].pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.focus != PORT || c.is_ascii_digit() {
                    self.values[self.focus].push(c);
                }
            }
            _ => {}
        }
        FormAction::Pending
    }

    fn required(&self, i: usize) -> bool {
        match self.editing {
            Some(_) => matches!(i, NAME | VENDOR | IP | USER),
            None => matches!(i, VENDOR | IP | USER | PASS),
        }
    }

    /// Adding needs vendor, IP, username and password; editing needs name, vendor, IP and
    /// username. An empty port means 22.
    pub fn submit(&self) -> FormAction {
        let v = |i: usize| self.values[i].trim().to_string();
        let missing = (0..LABELS.len())
            .filter(|&i| self.required(i))
            .any(|i| if i == PASS { self.values[i].is_empty() } else { v(i).is_empty() });
        if missing {
            let which = if self.is_edit() {
                "name, vendor, IP and username are required"
            } else {
                "vendor, IP, username and password are required"
            };
            return FormAction::Invalid(which.into());
        }
        let port = if v(PORT).is_empty() {
            22
        } else {
            match v(PORT).parse::<u16>() {
                Ok(p) if p > 0 => p,
                _ => return FormAction::Invalid("port must be between 1 and 65535".into()),
            }
        };
        if let Some(id) = &self.editing {
            return FormAction::Update {
                id: id.clone(),
                update: DeviceUpdate {
                    name: v(NAME),
                    vendor: v(VENDOR),
                    ip: v(IP),
                    port,
                    username: v(USER),
                    password: Some(self.values[PASS].clone()).filter(|p| !p.is_empty()),
                },
            };
        }
        FormAction::Submit(NewDevice {
            name: v(NAME),
            vendor: v(VENDOR),
            ip: v(IP),
            port,
            username: v(USER),
            password: self.values[PASS].clone(),
        })
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let popup = centered_rect(56, LABELS.len() as u16 + 5, area);
        f.render_widget(Clear, popup);

        let mut lines: Vec<Line> = Vec::with_capacity(LABELS.len() + 2);
        for (i, label) in LABELS.iter().enumerate() {
            let shown = if i == PASS {
                "*".repeat(self.values[i].chars().count())
            } else {
                self.values[i].clone()
            };
            let focused = i == self.focus;
            let value_style = if focused {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let required = if self.required(i) { "*" } else { " " };
            lines.push(Line::from(vec![
                Span::raw(format!("{required}{label:<9} ")),
                Span::styled(format!("{shown}{}", if focused { "_" } else { "" }), value_style),
            ]));
        }
        lines.push(Line::from(""));
        let (hint, title) = if self.is_edit() {
            ("Tab next · Enter save · Esc cancel (blank password: keep current)", "Edit device")
        } else {
            ("Tab next · Enter add · Esc cancel (blank name: backend picks one)", "Add device")
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

        let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(p, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(form: &mut DeviceForm, code: KeyCode) -> FormAction {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(form: &mut DeviceForm, s: &str) {
        for c in s.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut form = DeviceForm::new();
        type_str(&mut form, "core-sw");
        assert!(matches!(press(&mut form, KeyCode::Enter), FormAction::Invalid(_)));
    }

    #[test]
    fn complete_form_submits_with_default_port() {
        let mut form = DeviceForm::new();
        press(&mut form, KeyCode::Tab); // vendor
        type_str(&mut form, "Huawei");
        press(&mut form, KeyCode::Tab); // ip
        type_str(&mut form, " 10.0.0.7 ");
        press(&mut form, KeyCode::Tab); // port: letters ignored, keep 22
        type_str(&mut form, "ab");
        press(&mut form, KeyCode::Tab); // user
        type_str(&mut form, "admin");
        press(&mut form, KeyCode::Tab); // password
        type_str(&mut form, "p w");
        match press(&mut form, KeyCode::Enter) {
            FormAction::Submit(d) => {
                assert_eq!(d.name, "");
                assert_eq!(d.ip, "10.0.0.7");
                assert_eq!(d.port, 22);
                assert_eq!(d.password, "p w");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_port_and_escape() {
        let mut form = DeviceForm::new();
        for (field, text) in [(VENDOR, "Cisco"), (IP, "1.1.1.1"), (USER, "u"), (PASS, "p")] {
            form.values[field] = text.into();
        }
        form.values[PORT] = "70000".into();
        assert!(matches!(form.submit(), FormAction::Invalid(_)));
        press(&mut form, KeyCode::BackTab);
        assert_eq!(form.focus(), PASS);
        assert_eq!(press(&mut form, KeyCode::Esc), FormAction::Cancel);
    }

    fn inventory_entry() -> InventoryDevice {
        InventoryDevice {
            id: "dev-0003".into(),
            name: "edge-rtr-01".into(),
            ip: "10.0.0.3".into(),
            port: 2222,
            username: "admin".into(),
            vendor: "Cisco".into(),
            status: Default::default(),
        }
    }

    #[test]
    fn edit_prefills_and_keeps_password_unless_typed() {
        let mut form = DeviceForm::edit(&inventory_entry());
        assert!(form.is_edit());
        match press(&mut form, KeyCode::Enter) {
            FormAction::Update { id, update } => {
                assert_eq!(id, "dev-0003");
                assert_eq!(update.port, 2222);
                assert_eq!(update.name, "edge-rtr-01");
                assert_eq!(update.password, None);
            }
            other => panic!("unexpected {other:?}"),
        }

        form.values[PASS] = "new-secret".into();
        match form.submit() {
            FormAction::Update { update, .. } => {
                assert_eq!(update.password.as_deref(), Some("new-secret"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn edit_requires_a_name() {
        let mut form = DeviceForm::edit(&inventory_entry());
        form.values[NAME] = "  ".into();
        assert!(matches!(form.submit(), FormAction::Invalid(m) if m.contains("name")));
    }
}
