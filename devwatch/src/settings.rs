//! Refresh cadences, persisted next to the profiles as settings.json.

use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::profiles::config_dir;

pub const DEFAULT_FAST_MS: u64 = 10_000;
pub const DEFAULT_SLOW_MS: u64 = 1_800_000;

/// Choices offered by the settings dialog.
pub const FAST_PRESETS_MS: [u64; 4] = [5_000, 10_000, 30_000, 60_000];
pub const SLOW_PRESETS_MS: [u64; 5] = [60_000, 300_000, 600_000, 1_800_000, 3_600_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Metrics chart cadence.
    #[serde(rename = "cpu_refresh_interval", default = "default_fast")]
    pub fast_interval_ms: u64,
    /// Device table cadence.
    #[serde(rename = "device_status_refresh_interval", default = "default_slow")]
    pub slow_interval_ms: u64,
}

fn default_fast() -> u64 {
    DEFAULT_FAST_MS
}

fn default_slow() -> u64 {
    DEFAULT_SLOW_MS
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            fast_interval_ms: DEFAULT_FAST_MS,
            slow_interval_ms: DEFAULT_SLOW_MS,
        }
    }
}

impl RefreshConfig {
    pub fn fast(&self) -> Duration {
        Duration::from_millis(self.fast_interval_ms)
    }

    pub fn slow(&self) -> Duration {
        Duration::from_millis(self.slow_interval_ms)
    }

    // Zero periods would spin the timers; fall back per field.
    fn sanitized(mut self) -> Self {
        if self.fast_interval_ms == 0 {
            self.fast_interval_ms = DEFAULT_FAST_MS;
        }
        if self.slow_interval_ms == 0 {
            self.slow_interval_ms = DEFAULT_SLOW_MS;
        }
        self
    }
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> RefreshConfig {
    let path = settings_path();
    let Ok(s) = fs::read_to_string(&path) else {
        return RefreshConfig::default();
    };
    match serde_json::from_str::<RefreshConfig>(&s) {
        Ok(cfg) => cfg.sanitized(),
        Err(e) => {
            tracing::warn!("ignoring unreadable {}: {e}", path.display());
            RefreshConfig::default()
        }
    }
}

pub fn save_settings(cfg: &RefreshConfig) -> std::io::Result<()> {
    let path = settings_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(&cfg.sanitized())?;
    fs::write(path, data)
}

/// Next preset after `current` (wrapping); unknown values snap to the first preset.
pub fn cycle_preset(presets: &[u64], current: u64, forward: bool) -> u64 {
    let Some(pos) = presets.iter().position(|&p| p == current) else {
        return presets.first().copied().unwrap_or(current);
    };
    let n = presets.len();
    let next = if forward { (pos + 1) % n } else { (pos + n - 1) % n };
    presets[next]
}

/// "10s", "5min", "1h".
pub fn fmt_interval(ms: u64) -> String {
    let secs = ms / 1000;
    if ms % 1000 != 0 {
        format!("{ms}ms")
    } else if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}min", secs / 60)
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_and_zero_fields_fall_back() {
        let cfg: RefreshConfig = serde_json::from_str(r#"{"cpu_refresh_interval": 5000}"#).unwrap();
        assert_eq!(cfg.fast_interval_ms, 5000);
        assert_eq!(cfg.slow_interval_ms, DEFAULT_SLOW_MS);

        let cfg: RefreshConfig = serde_json::from_str(
            r#"{"cpu_refresh_interval": 0, "device_status_refresh_interval": 60000}"#,
        )
        .unwrap();
        let cfg = cfg.sanitized();
        assert_eq!(cfg.fast_interval_ms, DEFAULT_FAST_MS);
        assert_eq!(cfg.slow_interval_ms, 60_000);
    }

    #[test]
    fn presets_wrap_both_ways() {
        assert_eq!(cycle_preset(&FAST_PRESETS_MS, 10_000, true), 30_000);
        assert_eq!(cycle_preset(&FAST_PRESETS_MS, 60_000, true), 5_000);
        assert_eq!(cycle_preset(&FAST_PRESETS_MS, 5_000, false), 60_000);
        assert_eq!(cycle_preset(&FAST_PRESETS_MS, 7_000, true), 5_000);
    }

    #[test]
    fn interval_labels() {
        assert_eq!(fmt_interval(10_000), "10s");
        assert_eq!(fmt_interval(300_000), "5min");
        assert_eq!(fmt_interval(3_600_000), "1h");
        assert_eq!(fmt_interval(1_500), "1500ms");
    }
}
