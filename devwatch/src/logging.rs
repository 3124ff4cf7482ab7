//! Log setup. The terminal belongs to the TUI, so events go to a file in the config dir.

use std::{fs, path::PathBuf, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::profiles::config_dir;

pub const LOG_ENV: &str = "DEVWATCH_LOG";

pub fn log_path() -> PathBuf {
    config_dir().join("devwatch.log")
}

/// Installs the global subscriber; returns the log file path, or `None` if logging is unavailable.
pub fn init() -> Option<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok()?;
    Some(path)
}
