//! Shared demo state: the in-memory device inventory.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct StoredDevice {
    pub id: String,
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub vendor: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub version: Option<String>,
    /// Answers on its management port.
    pub reachable: bool,
    /// Returns CPU/memory readings when polled.
    pub reports: bool,
}

pub type SharedDevices = Arc<Mutex<Vec<StoredDevice>>>;

#[derive(Clone)]
pub struct DemoState {
    pub devices: SharedDevices,
    next_id: Arc<AtomicU64>,
    // Phase origin for the synthetic readings
    pub started: Instant,
}

impl DemoState {
    pub fn empty() -> Self {
        Self {
            devices: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            started: Instant::now(),
        }
    }

    /// A small lab: three reporting switches/routers, one unreachable firewall and
    /// one reachable device that returns no readings.
    pub fn seeded() -> Self {
        let state = Self::empty();
        let seed = [
            ("core-sw-01", "Huawei", "10.0.0.1", "S5735-L48T4X", true, true),
            ("agg-sw-02", "H3C", "10.0.0.2", "S6520X-30QC", true, true),
            ("edge-rtr-01", "Cisco", "10.0.0.3", "ISR4331", true, true),
            ("fw-01", "Huawei", "10.0.0.4", "USG6510E", false, false),
            ("lab-sw-09", "Cisco", "10.0.0.9", "C9200L-24T", true, false),
        ];
        let devices = seed
            .iter()
            .map(|&(name, vendor, ip, model, reachable, reports)| StoredDevice {
                id: state.next_id(),
                model: Some(model.into()),
                serial_number: Some(format!("SN{}", ip.replace('.', ""))),
                version: None,
                name: name.into(),
                ip: ip.into(),
                port: 22,
                username: "admin".into(),
                password: "admin".into(),
                vendor: vendor.into(),
                reachable,
                reports,
            })
            .collect();
        Self {
            devices: Arc::new(Mutex::new(devices)),
            ..state
        }
    }

    pub fn next_id(&self) -> String {
        format!("dev-{:04}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for DemoState {
    fn default() -> Self {
        Self::seeded()
    }
}
