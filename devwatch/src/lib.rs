//! Library entry for devwatch: exposes modules for the binary and integration tests.

pub mod api;
pub mod app;
pub mod history;
pub mod logging;
pub mod profiles;
pub mod scheduler;
pub mod settings;
pub mod types;
pub mod ui;
pub mod views;
