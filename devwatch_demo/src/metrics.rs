//! Synthetic device readings for the demo backend.
//!
//! Values drift smoothly over time so the console charts have something to draw.
//! Each device gets its own phase derived from its id.

use std::time::Duration;

use crate::state::StoredDevice;
use crate::types::{
    DashboardData, DetailHistory, DeviceDetail, DeviceReading, InterfaceInfo, InventoryEntry,
};

/// Points in a detail history and their spacing.
pub const DETAIL_POINTS: usize = 20;
pub const DETAIL_STEP: Duration = Duration::from_secs(30);

fn phase(id: &str) -> f64 {
    let h = id
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    f64::from(h % 628) / 100.0
}

fn wave(elapsed: Duration, period_s: f64, phase: f64) -> f64 {
    (elapsed.as_secs_f64() / period_s * std::f64::consts::TAU + phase).sin()
}

fn one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn reading(d: &StoredDevice, elapsed: Duration) -> DeviceReading {
    let (status, cpu, memory, temperature) = if !d.reachable {
        ("offline", None, None, None)
    } else if !d.reports {
        ("online", None, None, None)
    } else {
        let p = phase(&d.id);
        let cpu = 35.0 + 25.0 * wave(elapsed, 90.0, p) + 5.0 * wave(elapsed, 17.0, p * 2.0);
        let mem = 55.0 + 10.0 * wave(elapsed, 300.0, p);
        let temp = 42.0 + 6.0 * wave(elapsed, 240.0, p);
        (
            "online",
            Some(one_decimal(cpu.clamp(0.0, 100.0))),
            Some(one_decimal(mem.clamp(0.0, 100.0))),
            Some(temp.round()),
        )
    };
    DeviceReading {
        id: d.id.clone(),
        name: d.name.clone(),
        vendor: d.vendor.clone(),
        ip: d.ip.clone(),
        port: d.port,
        status,
        cpu,
        memory,
        temperature,
    }
}

pub fn collect_dashboard(devices: &[StoredDevice], elapsed: Duration) -> DashboardData {
    let readings: Vec<DeviceReading> = devices.iter().map(|d| reading(d, elapsed)).collect();
    let online = readings.iter().filter(|r| r.status == "online").count();
    DashboardData {
        total: readings.len(),
        online,
        offline: readings.len() - online,
        devices: readings,
    }
}

pub fn inventory(devices: &[StoredDevice]) -> Vec<InventoryEntry> {
    devices
        .iter()
        .map(|d| InventoryEntry {
            id: d.id.clone(),
            name: d.name.clone(),
            ip: d.ip.clone(),
            port: d.port,
            username: d.username.clone(),
            vendor: d.vendor.clone(),
            status: if d.reachable { "online" } else { "offline" },
        })
        .collect()
}

fn interfaces(d: &StoredDevice) -> Vec<InterfaceInfo> {
    let prefix = match d.vendor.as_str() {
        "Cisco" => "GigabitEthernet0/",
        "H3C" => "GigabitEthernet1/0/",
        _ => "GigabitEthernet0/0/",
    };
    (1..=4)
        .map(|n| InterfaceInfo {
            name: format!("{prefix}{n}"),
            status: if n == 3 { "down" } else { "up" },
            speed: "1G",
            description: (n == 1).then(|| "uplink".to_string()),
        })
        .collect()
}

/// Detail of one device: current reading plus readings at `DETAIL_STEP` spacing ending now.
pub fn detail(
    d: &StoredDevice,
    elapsed: Duration,
    now: chrono::DateTime<chrono::Local>,
) -> DeviceDetail {
    let current = reading(d, elapsed);
    let mut history = DetailHistory::default();
    for i in 0..DETAIL_POINTS {
        let back = DETAIL_STEP * (DETAIL_POINTS - 1 - i) as u32;
        let at = now - chrono::Duration::from_std(back).unwrap_or_else(|_| chrono::Duration::zero());
        let r = reading(d, elapsed.saturating_sub(back));
        history.timestamps.push(at.format("%H:%M:%S").to_string());
        history.cpu.push(r.cpu);
        history.memory.push(r.memory);
    }
    let live = current.cpu.is_some();
    let uptime_h = 24 * 17 + elapsed.as_secs() / 3600;
    DeviceDetail {
        id: d.id.clone(),
        name: d.name.clone(),
        vendor: d.vendor.clone(),
        ip: d.ip.clone(),
        port: d.port,
        status: current.status,
        hostname: live.then(|| d.name.clone()),
        model: d.model.clone(),
        serial_number: d.serial_number.clone(),
        version: d.version.clone(),
        uptime: live.then(|| format!("{} days, {} hours", uptime_h / 24, uptime_h % 24)),
        cpu: current.cpu,
        memory: current.memory,
        temperature: current.temperature,
        interfaces: if live { interfaces(d) } else { Vec::new() },
        history,
    }
}
