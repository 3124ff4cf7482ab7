//! Types that mirror the backend's JSON schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeviceStatus {
    pub fn is_online(self) -> bool {
        matches!(self, DeviceStatus::Online)
    }
}

/// One row of `/api/dashboard/data`: identity plus the latest polled readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub ip: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub cpu: Option<f64>,
    #[serde(default)]
    pub memory: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardData {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// Inventory entry from `/api/devices`. Credentials in the payload are not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDevice {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub ip: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub status: DeviceStatus,
}

fn default_port() -> u16 {
    22
}

/// Body of `POST /api/devices`. An empty name lets the backend pick one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDevice {
    pub name: String,
    pub vendor: String,
    pub ip: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Body of `PUT /api/devices/:id`. A missing password keeps the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub name: String,
    pub vendor: String,
    pub ip: String,
    pub port: u16,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Recent per-device readings, oldest first. The three vectors are index-aligned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailHistory {
    #[serde(default)]
    pub timestamps: Vec<String>,
    #[serde(default)]
    pub cpu: Vec<Option<f64>>,
    #[serde(default)]
    pub memory: Vec<Option<f64>>,
}

/// Payload of `GET /api/devices/:id/detail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDetail {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vendor: String,
    pub ip: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
    #[serde(default)]
    pub cpu: Option<f64>,
    #[serde(default)]
    pub memory: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub history: DetailHistory,
}

// Response envelopes. Every endpoint answers with `success` plus a payload or message.

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<DashboardData>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevicesEnvelope {
    pub success: bool,
    #[serde(default)]
    pub devices: Option<Vec<InventoryDevice>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<DeviceDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
