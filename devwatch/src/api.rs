//! HTTP client for the monitoring backend's JSON API.

use std::time::Duration;

use reqwest::{Certificate, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::types::{
    DashboardData, DashboardEnvelope, DetailEnvelope, DeviceDetail, DeviceUpdate, DevicesEnvelope,
    InventoryDevice, NewDevice, StatusEnvelope,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response has no {0}")]
    Missing(&'static str),
    #[error("{0}")]
    Config(String),
}

impl ApiError {
    /// Short text suitable for a one-line notice.
    pub fn summary(&self) -> String {
        match self {
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Transport(e) if e.is_timeout() => "backend timed out".into(),
            ApiError::Transport(e) if e.is_connect() => "backend unreachable".into(),
            other => other.to_string(),
        }
    }
}

// Implemented by every envelope so `send` can turn `success: false` into an error.
trait Envelope {
    fn success(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

macro_rules! envelope {
    ($t:ty) => {
        impl Envelope for $t {
            fn success(&self) -> bool {
                self.success
            }
            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        }
    };
}

envelope!(DashboardEnvelope);
envelope!(DevicesEnvelope);
envelope!(DetailEnvelope);
envelope!(StatusEnvelope);

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// `base_url` is the backend root, e.g. `http://10.0.0.5:5000`. A path prefix is kept.
    pub fn new(base_url: &str, tls_ca: Option<&str>) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid backend URL '{base_url}': {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "backend URL must be http:// or https://, got '{base_url}'"
            )));
        }
        if base.cannot_be_a_base() {
            return Err(ApiError::Config(format!("backend URL '{base_url}' has no host")));
        }
        if !base.path().ends_with('/') {
            let p = format!("{}/", base.path());
            base.set_path(&p);
        }

        let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(path) = tls_ca {
            let pem = std::fs::read(path)
                .map_err(|e| ApiError::Config(format!("cannot read CA file {path}: {e}")))?;
            let cert = Certificate::from_pem(&pem)
                .map_err(|e| ApiError::Config(format!("invalid CA file {path}: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        Ok(Self {
            http: builder.build()?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut u = self.base.clone();
        u.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("cannot build URL from {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(u)
    }

    async fn send<E, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<E, ApiError>
    where
        E: DeserializeOwned + Envelope,
        B: serde::Serialize + ?Sized,
    {
        tracing::debug!(%method, %url, "backend request");
        let mut req = self.http.request(method, url);
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        let env: E = match serde_json::from_slice(&bytes) {
            Ok(env) => env,
            Err(_) if !status.is_success() => {
                return Err(ApiError::Api {
                    status,
                    message: status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string(),
                })
            }
            Err(e) => return Err(ApiError::Decode(e)),
        };
        if !env.success() || !status.is_success() {
            return Err(ApiError::Api {
                status,
                message: env.message().unwrap_or("request failed").to_string(),
            });
        }
        Ok(env)
    }

    /// `GET /api/dashboard/data`: counts plus the polled device list.
    pub async fn dashboard_data(&self) -> Result<DashboardData, ApiError> {
        let url = self.endpoint(&["api", "dashboard", "data"])?;
        let env: DashboardEnvelope = self.send::<_, ()>(Method::GET, url, None).await?;
        env.data.ok_or(ApiError::Missing("dashboard data"))
    }

    /// `GET /api/devices`: the device inventory.
    pub async fn list_devices(&self) -> Result<Vec<InventoryDevice>, ApiError> {
        let url = self.endpoint(&["api", "devices"])?;
        let env: DevicesEnvelope = self.send::<_, ()>(Method::GET, url, None).await?;
        env.devices.ok_or(ApiError::Missing("device list"))
    }

    /// `GET /api/devices/:id/detail`: identity, interfaces and recent readings of one device.
    pub async fn device_detail(&self, id: &str) -> Result<DeviceDetail, ApiError> {
        let url = self.endpoint(&["api", "devices", id, "detail"])?;
        let env: DetailEnvelope = self.send::<_, ()>(Method::GET, url, None).await?;
        env.data.ok_or(ApiError::Missing("device detail"))
    }

    /// `PUT /api/devices/:id`. Returns the backend's message, if any.
    pub async fn update_device(&self, id: &str, update: &DeviceUpdate) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["api", "devices", id])?;
        let env: StatusEnvelope = self.send(Method::PUT, url, Some(update)).await?;
        Ok(env.message)
    }

    /// `DELETE /api/devices/:id`. Returns the backend's message, if any.
    pub async fn delete_device(&self, id: &str) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["api", "devices", id])?;
        let env: StatusEnvelope = self.send::<_, ()>(Method::DELETE, url, None).await?;
        Ok(env.message)
    }

    /// `POST /api/devices`. Returns the backend's message, if any.
    pub async fn create_device(&self, device: &NewDevice) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["api", "devices"])?;
        let env: StatusEnvelope = self.send(Method::POST, url, Some(device)).await?;
        Ok(env.message)
    }
}
