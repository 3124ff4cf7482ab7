//! Data types sent to the console over HTTP.
//! Keep this module minimal and stable: it defines the wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone)]
pub struct DeviceReading {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub ip: String,
    pub port: u16,
    pub status: &'static str,
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Serialize, Clone)]
pub struct DashboardData {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub devices: Vec<DeviceReading>,
}

/// Inventory view of a device; the password never leaves the backend.
#[derive(Debug, Serialize, Clone)]
pub struct InventoryEntry {
    pub id: String,
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub username: String,
    pub vendor: String,
    pub status: &'static str,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AddDevice {
    pub name: String,
    pub vendor: String,
    pub ip: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
}

/// `PUT /api/devices/:id`: absent fields keep their stored value, an empty password too.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdateDevice {
    pub name: Option<String>,
    pub vendor: Option<String>,
    pub ip: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct InterfaceInfo {
    pub name: String,
    pub status: &'static str,
    pub speed: &'static str,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct DetailHistory {
    pub timestamps: Vec<String>,
    pub cpu: Vec<Option<f64>>,
    pub memory: Vec<Option<f64>>,
}

#[derive(Debug, Serialize, Clone)]
pub struct DeviceDetail {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub ip: String,
    pub port: u16,
    pub status: &'static str,
    pub hostname: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub version: Option<String>,
    pub uptime: Option<String>,
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
    pub temperature: Option<f64>,
    pub interfaces: Vec<InterfaceInfo>,
    pub history: DetailHistory,
}
