//! Shared UI theme constants.

use ratatui::style::Color;

pub const CPU_LINE: Color = Color::Cyan;
pub const MEM_LINE: Color = Color::Magenta;
pub const AXIS: Color = Color::DarkGray;

pub const ONLINE: Color = Color::Green;
pub const OFFLINE: Color = Color::Red;
pub const UNKNOWN: Color = Color::DarkGray;

pub const HEADER_FG: Color = Color::Cyan;
pub const ROW_HIGHLIGHT: Color = Color::Rgb(60, 60, 80);
pub const MARKED: Color = Color::Yellow;
