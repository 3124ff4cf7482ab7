//! UI module root: exposes drawing functions for individual panels and dialogs.

pub mod chart;
pub mod detail;
pub mod devices;
pub mod form;
pub mod header;
pub mod inventory;
pub mod notice;
pub mod settings;
pub mod theme;
pub mod util;
