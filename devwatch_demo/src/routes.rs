//! HTTP routes. Every response is a `{ success, ... }` envelope, failures included.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};

use crate::metrics::{collect_dashboard, detail, inventory};
use crate::state::{DemoState, StoredDevice};
use crate::types::{AddDevice, UpdateDevice};

pub fn router(state: DemoState) -> Router {
    Router::new()
        .route("/api/dashboard/data", get(dashboard_data))
        .route("/api/devices", get(list_devices).post(add_device))
        .route("/api/devices/:id", delete(delete_device).put(update_device))
        .route("/api/devices/:id/detail", get(device_detail))
        .with_state(state)
}

async fn dashboard_data(State(state): State<DemoState>) -> Json<Value> {
    let devices = state.devices.lock().await;
    let data = collect_dashboard(&devices, state.started.elapsed());
    Json(json!({ "success": true, "data": data }))
}

async fn list_devices(State(state): State<DemoState>) -> Json<Value> {
    let devices = state.devices.lock().await;
    Json(json!({ "success": true, "devices": inventory(&devices) }))
}

async fn add_device(State(state): State<DemoState>, Json(body): Json<AddDevice>) -> Json<Value> {
    let ip = body.ip.trim().to_string();
    if ip.is_empty() || body.vendor.trim().is_empty() || body.username.trim().is_empty() {
        return Json(json!({ "success": false, "message": "vendor, ip and username are required" }));
    }

    let mut devices = state.devices.lock().await;
    if devices.iter().any(|d| d.ip == ip) {
        tracing::info!(%ip, "rejecting duplicate device");
        return Json(json!({ "success": false, "message": "device already exists" }));
    }
    let vendor = body.vendor.trim().to_string();
    let name = match body.name.trim() {
        "" => format!("{vendor}_{ip}"),
        n => n.to_string(),
    };
    let device = StoredDevice {
        id: state.next_id(),
        name,
        ip,
        port: body.port.unwrap_or(22),
        username: body.username.trim().to_string(),
        password: body.password,
        vendor,
        model: None,
        serial_number: None,
        version: None,
        reachable: true,
        reports: true,
    };
    tracing::info!(id = %device.id, ip = %device.ip, "device added");
    let entry = inventory(std::slice::from_ref(&device));
    devices.push(device);
    Json(json!({ "success": true, "message": "device added", "device": entry[0] }))
}

async fn delete_device(State(state): State<DemoState>, Path(id): Path<String>) -> Json<Value> {
    let mut devices = state.devices.lock().await;
    let before = devices.len();
    devices.retain(|d| d.id != id);
    if devices.len() == before {
        return Json(json!({ "success": false, "message": "device not found" }));
    }
    tracing::info!(%id, "device deleted");
    Json(json!({ "success": true, "message": "device deleted" }))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "device not found" })),
    )
}

async fn update_device(
    State(state): State<DemoState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateDevice>,
) -> (StatusCode, Json<Value>) {
    let mut devices = state.devices.lock().await;
    if let Some(ip) = body.ip.as_deref().map(str::trim) {
        if devices.iter().any(|d| d.id != id && d.ip == ip) {
            return (
                StatusCode::OK,
                Json(json!({ "success": false, "message": "device already exists" })),
            );
        }
    }
    let Some(device) = devices.iter_mut().find(|d| d.id == id) else {
        return not_found();
    };

    let keep = |new: Option<String>, old: &mut String| {
        if let Some(v) = new.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            *old = v;
        }
    };
    keep(body.name, &mut device.name);
    keep(body.vendor, &mut device.vendor);
    keep(body.ip, &mut device.ip);
    keep(body.username, &mut device.username);
    if let Some(p) = body.password.filter(|p| !p.is_empty()) {
        device.password = p;
    }
    if let Some(port) = body.port {
        device.port = port;
    }
    if body.model.is_some() {
        device.model = body.model;
    }
    if body.serial_number.is_some() {
        device.serial_number = body.serial_number;
    }
    if body.version.is_some() {
        device.version = body.version;
    }
    tracing::info!(%id, ip = %device.ip, "device updated");
    let entry = inventory(std::slice::from_ref(device));
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "device updated", "device": entry[0] })),
    )
}

async fn device_detail(
    State(state): State<DemoState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let devices = state.devices.lock().await;
    let Some(device) = devices.iter().find(|d| d.id == id) else {
        return not_found();
    };
    let data = detail(device, state.started.elapsed(), chrono::Local::now());
    (StatusCode::OK, Json(json!({ "success": true, "data": data })))
}
