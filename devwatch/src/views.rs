//! Pure transforms from backend payloads to the row models the UI draws.

use std::collections::BTreeSet;

use crate::types::{DashboardData, Device, DeviceDetail, DeviceStatus, Interface, InventoryDevice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
}

pub fn summary(data: &DashboardData) -> Summary {
    Summary {
        total: data.total,
        online: data.online,
        offline: data.offline,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub ip: String,
    pub cpu: String,
    pub memory: String,
    pub temperature: String,
    pub status: &'static str,
    pub online: bool,
}

fn fmt_reading(v: Option<f64>, unit: &str) -> String {
    match v {
        // Whole numbers print without a fraction, like the backend sends them.
        Some(x) if x.fract() == 0.0 => format!("{x:.0}{unit}"),
        Some(x) => format!("{x:.1}{unit}"),
        None => "-".into(),
    }
}

pub fn status_text(s: DeviceStatus) -> &'static str {
    match s {
        DeviceStatus::Online => "online",
        DeviceStatus::Offline => "offline",
        DeviceStatus::Unknown => "unknown",
    }
}

pub fn device_rows(devices: &[Device]) -> Vec<DeviceRow> {
    devices
        .iter()
        .map(|d| DeviceRow {
            id: d.id.clone(),
            name: d.name.clone(),
            vendor: d.vendor.clone(),
            ip: d.ip.clone(),
            cpu: fmt_reading(d.cpu, "%"),
            memory: fmt_reading(d.memory, "%"),
            temperature: fmt_reading(d.temperature, "°C"),
            status: status_text(d.status),
            online: d.status.is_online(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub address: String,
    pub username: String,
    pub selected: bool,
}

pub fn inventory_rows(devices: &[InventoryDevice], selected: &BTreeSet<String>) -> Vec<InventoryRow> {
    devices
        .iter()
        .map(|d| InventoryRow {
            id: d.id.clone(),
            name: if d.name.is_empty() {
                d.ip.clone()
            } else {
                d.name.clone()
            },
            vendor: d.vendor.clone(),
            address: format!("{}:{}", d.ip, d.port),
            username: d.username.clone(),
            selected: selected.contains(&d.id),
        })
        .collect()
}

/// Label/value pairs for the detail info panel. Optional identity fields appear only when known.
pub fn detail_fields(d: &DeviceDetail) -> Vec<(&'static str, String)> {
    let name = if d.name.is_empty() { d.ip.clone() } else { d.name.clone() };
    let mut out = vec![
        ("Name", name),
        ("Vendor", if d.vendor.is_empty() { "-".into() } else { d.vendor.clone() }),
        ("Address", format!("{}:{}", d.ip, d.port.unwrap_or(22))),
        ("Status", status_text(d.status).to_string()),
    ];
    let optional = [
        ("Hostname", &d.hostname),
        ("Model", &d.model),
        ("Serial", &d.serial_number),
        ("Version", &d.version),
        ("Uptime", &d.uptime),
    ];
    for (label, v) in optional {
        if let Some(v) = v.as_deref().filter(|v| !v.is_empty()) {
            out.push((label, v.to_string()));
        }
    }
    out.push(("CPU", fmt_reading(d.cpu, "%")));
    out.push(("Memory", fmt_reading(d.memory, "%")));
    out.push(("Temp", fmt_reading(d.temperature, "°C")));
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRow {
    pub name: String,
    pub status: &'static str,
    pub up: bool,
    pub speed: String,
    pub description: String,
}

pub fn interface_rows(ifaces: &[Interface]) -> Vec<InterfaceRow> {
    ifaces
        .iter()
        .map(|i| {
            let up = i.status.eq_ignore_ascii_case("up");
            InterfaceRow {
                name: i.name.clone(),
                status: if up { "UP" } else { "DOWN" },
                up,
                speed: i.speed.clone().unwrap_or_else(|| "-".into()),
                description: i.description.clone().unwrap_or_else(|| "-".into()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(status: DeviceStatus, cpu: Option<f64>, temp: Option<f64>) -> Device {
        Device {
            id: "1".into(),
            name: "core".into(),
            ip: "10.1.1.1".into(),
            vendor: "Huawei".into(),
            port: None,
            status,
            cpu,
            memory: None,
            temperature: temp,
        }
    }

    #[test]
    fn null_readings_render_as_dash() {
        let rows = device_rows(&[device(DeviceStatus::Offline, None, None)]);
        assert_eq!(rows[0].cpu, "-");
        assert_eq!(rows[0].memory, "-");
        assert_eq!(rows[0].temperature, "-");
        assert_eq!(rows[0].status, "offline");
        assert!(!rows[0].online);
    }

    #[test]
    fn readings_keep_backend_precision() {
        let rows = device_rows(&[device(DeviceStatus::Online, Some(45.0), Some(38.5))]);
        assert_eq!(rows[0].cpu, "45%");
        assert_eq!(rows[0].temperature, "38.5°C");
        assert!(rows[0].online);
    }

    #[test]
    fn inventory_marks_selection_and_falls_back_to_ip() {
        let devs = vec![InventoryDevice {
            id: "x".into(),
            name: String::new(),
            ip: "192.168.0.9".into(),
            port: 2222,
            username: "ops".into(),
            vendor: "Cisco".into(),
            status: DeviceStatus::Unknown,
        }];
        let mut sel = BTreeSet::new();
        sel.insert("x".to_string());
        let rows = inventory_rows(&devs, &sel);
        assert_eq!(rows[0].name, "192.168.0.9");
        assert_eq!(rows[0].address, "192.168.0.9:2222");
        assert!(rows[0].selected);
    }

    #[test]
    fn detail_fields_skip_unknown_identity() {
        let d = DeviceDetail {
            id: "d1".into(),
            name: String::new(),
            vendor: "Cisco".into(),
            ip: "10.2.2.2".into(),
            port: None,
            status: DeviceStatus::Online,
            hostname: Some("edge-rtr".into()),
            model: Some(String::new()),
            serial_number: None,
            version: Some("15.2".into()),
            uptime: None,
            cpu: Some(12.0),
            memory: None,
            temperature: Some(40.5),
            interfaces: Vec::new(),
            history: Default::default(),
        };
        let fields = detail_fields(&d);
        let labels: Vec<&str> = fields.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            ["Name", "Vendor", "Address", "Status", "Hostname", "Version", "CPU", "Memory", "Temp"]
        );
        assert_eq!(fields[0].1, "10.2.2.2");
        assert_eq!(fields[2].1, "10.2.2.2:22");
        assert_eq!(fields[7].1, "-");
        assert_eq!(fields[8].1, "40.5°C");
    }

    #[test]
    fn interface_status_is_normalised() {
        let rows = interface_rows(&[
            Interface {
                name: "Gi0/0/1".into(),
                status: "up".into(),
                speed: Some("1G".into()),
                description: None,
            },
            Interface {
                name: "Gi0/0/2".into(),
                status: "administratively down".into(),
                speed: None,
                description: Some("spare".into()),
            },
        ]);
        assert_eq!((rows[0].status, rows[0].up), ("UP", true));
        assert_eq!(rows[0].description, "-");
        assert_eq!((rows[1].status, rows[1].speed.as_str()), ("DOWN", "-"));
    }
}
