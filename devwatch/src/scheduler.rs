//! Refresh scheduler: two independent polling cadences feeding the UI loop.
//!
//! The slow cycle loads the full dashboard snapshot (counts, device table and a
//! chart sample) right away and then every `slow_interval_ms`. The fast cycle
//! waits for the next wall-clock :00/:30 boundary and then refreshes only the
//! chart every `fast_interval_ms`. Results travel over an mpsc channel; the
//! receiving side owns all view state.
//!
//! `DetailPoller` is the per-device counterpart used while a detail view is open.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};

use crate::api::{ApiClient, ApiError};
use crate::settings::RefreshConfig;
use crate::types::{DashboardData, Device, DeviceDetail};

/// Anything that can produce a dashboard snapshot.
pub trait DashboardSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<DashboardData, ApiError>> + Send;
}

impl DashboardSource for ApiClient {
    fn fetch(&self) -> impl Future<Output = Result<DashboardData, ApiError>> + Send {
        self.dashboard_data()
    }
}

/// Anything that can produce the detail of one device.
pub trait DetailSource: Send + Sync + 'static {
    fn detail(&self, id: &str) -> impl Future<Output = Result<DeviceDetail, ApiError>> + Send;
}

impl DetailSource for ApiClient {
    fn detail(&self, id: &str) -> impl Future<Output = Result<DeviceDetail, ApiError>> + Send {
        self.device_detail(id)
    }
}

/// Refresh period of an open device detail view.
pub const DETAIL_REFRESH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    Fast,
    Slow,
    /// Out-of-band load (manual refresh).
    Manual,
}

#[derive(Debug)]
pub enum Update {
    /// Full snapshot: counts, device table and a chart sample.
    Snapshot {
        seq: u64,
        cycle: Cycle,
        data: DashboardData,
    },
    /// Chart-only refresh.
    Metrics { seq: u64, devices: Vec<Device> },
    Failed { cycle: Cycle, error: String },
}

impl Update {
    pub fn seq(&self) -> Option<u64> {
        match self {
            Update::Snapshot { seq, .. } | Update::Metrics { seq, .. } => Some(*seq),
            Update::Failed { .. } => None,
        }
    }
}

const BOUNDARY_MS: u64 = 30_000;

/// Milliseconds until the next :00 or :30 second mark. An exact boundary waits a full period.
pub fn delay_to_boundary(second: u32, millis: u32) -> Duration {
    let into_minute = u64::from(second % 60) * 1000 + u64::from(millis.min(999));
    let target = if into_minute < BOUNDARY_MS {
        BOUNDARY_MS
    } else {
        2 * BOUNDARY_MS
    };
    Duration::from_millis(target - into_minute)
}

/// `(second, millisecond)` of the current minute.
pub type Clock = fn() -> (u32, u32);

pub fn wall_clock() -> (u32, u32) {
    let now = chrono::Local::now();
    (now.second(), now.timestamp_subsec_millis())
}

pub struct Scheduler<S: DashboardSource> {
    source: Arc<S>,
    tx: UnboundedSender<Update>,
    seq: Arc<AtomicU64>,
    fast: Option<JoinHandle<()>>,
    slow: Option<JoinHandle<()>>,
    clock: Clock,
}

impl<S: DashboardSource> Scheduler<S> {
    pub fn new(source: Arc<S>, tx: UnboundedSender<Update>) -> Self {
        Self {
            source,
            tx,
            seq: Arc::new(AtomicU64::new(0)),
            fast: None,
            slow: None,
            clock: wall_clock,
        }
    }

    /// Replaces the wall clock used to align the fast cycle.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn is_running(&self) -> bool {
        self.fast.is_some() || self.slow.is_some()
    }

    pub fn start(&mut self, cfg: RefreshConfig) {
        // Never leave a previous pair of timers behind.
        self.stop();

        let (second, millis) = (self.clock)();
        let first_fast = delay_to_boundary(second, millis);
        tracing::info!(
            fast_ms = cfg.fast_interval_ms,
            slow_ms = cfg.slow_interval_ms,
            first_fast_ms = first_fast.as_millis() as u64,
            "dashboard refresh started"
        );

        let (source, seq, tx) = (self.source.clone(), self.seq.clone(), self.tx.clone());
        let slow_period = cfg.slow().max(Duration::from_millis(1));
        self.slow = Some(tokio::spawn(async move {
            let mut tick = interval(slow_period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // First tick completes immediately: that is the initial full load.
                tick.tick().await;
                if !load_snapshot(&*source, &seq, &tx, Cycle::Slow).await {
                    break;
                }
            }
        }));

        let (source, seq, tx) = (self.source.clone(), self.seq.clone(), self.tx.clone());
        let fast_period = cfg.fast().max(Duration::from_millis(1));
        self.fast = Some(tokio::spawn(async move {
            sleep(first_fast).await;
            let mut tick = interval(fast_period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                if !load_metrics(&*source, &seq, &tx).await {
                    break;
                }
            }
        }));
    }

    /// Cancels both timers. Safe to call when already stopped.
    pub fn stop(&mut self) {
        let mut stopped = false;
        for handle in [self.fast.take(), self.slow.take()].into_iter().flatten() {
            handle.abort();
            stopped = true;
        }
        if stopped {
            tracing::info!("dashboard refresh stopped");
        }
    }

    pub fn restart(&mut self, cfg: RefreshConfig) {
        self.stop();
        self.start(cfg);
    }

    /// Full load outside the cadences; runs whether or not the timers are active.
    pub fn refresh_now(&self) {
        let (source, seq, tx) = (self.source.clone(), self.seq.clone(), self.tx.clone());
        tokio::spawn(async move {
            load_snapshot(&*source, &seq, &tx, Cycle::Manual).await;
        });
    }
}

impl<S: DashboardSource> Drop for Scheduler<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug)]
pub enum DetailUpdate {
    Loaded { seq: u64, detail: DeviceDetail },
    Failed { id: String, error: String },
}

/// Polls one device's detail: immediately, then every period, until stopped.
pub struct DetailPoller<S: DetailSource> {
    source: Arc<S>,
    tx: UnboundedSender<DetailUpdate>,
    seq: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
    device: Option<String>,
}

impl<S: DetailSource> DetailPoller<S> {
    pub fn new(source: Arc<S>, tx: UnboundedSender<DetailUpdate>) -> Self {
        Self {
            source,
            tx,
            seq: Arc::new(AtomicU64::new(0)),
            task: None,
            device: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Device currently (or last) polled.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn start(&mut self, id: String, period: Duration) {
        self.stop();
        tracing::info!(device = %id, period_ms = period.as_millis() as u64, "device detail polling started");
        self.device = Some(id.clone());

        let (source, seq, tx) = (self.source.clone(), self.seq.clone(), self.tx.clone());
        let period = period.max(Duration::from_millis(1));
        self.task = Some(tokio::spawn(async move {
            let mut tick = interval(period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                if !load_detail(&*source, &seq, &tx, &id).await {
                    break;
                }
            }
        }));
    }

    /// Idempotent. The last device id is kept so late results can still be matched.
    pub fn stop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
            tracing::info!(device = ?self.device, "device detail polling stopped");
        }
    }
}

impl<S: DetailSource> Drop for DetailPoller<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn load_detail<S: DetailSource>(
    source: &S,
    seq: &AtomicU64,
    tx: &UnboundedSender<DetailUpdate>,
    id: &str,
) -> bool {
    let n = seq.fetch_add(1, Ordering::Relaxed) + 1;
    let update = match source.detail(id).await {
        Ok(detail) => DetailUpdate::Loaded { seq: n, detail },
        Err(e) => {
            tracing::warn!(device = %id, "device detail load failed: {e}");
            DetailUpdate::Failed {
                id: id.to_string(),
                error: e.summary(),
            }
        }
    };
    tx.send(update).is_ok()
}

// Returns false once the receiving side is gone.
async fn load_snapshot<S: DashboardSource>(
    source: &S,
    seq: &AtomicU64,
    tx: &UnboundedSender<Update>,
    cycle: Cycle,
) -> bool {
    let n = seq.fetch_add(1, Ordering::Relaxed) + 1;
    let update = match source.fetch().await {
        Ok(data) => {
            tracing::debug!(
                ?cycle,
                total = data.total,
                online = data.online,
                offline = data.offline,
                "dashboard snapshot"
            );
            Update::Snapshot {
                seq: n,
                cycle,
                data,
            }
        }
        Err(e) => {
            tracing::warn!(?cycle, "dashboard load failed: {e}");
            Update::Failed {
                cycle,
                error: e.summary(),
            }
        }
    };
    tx.send(update).is_ok()
}

async fn load_metrics<S: DashboardSource>(
    source: &S,
    seq: &AtomicU64,
    tx: &UnboundedSender<Update>,
) -> bool {
    let n = seq.fetch_add(1, Ordering::Relaxed) + 1;
    let update = match source.fetch().await {
        Ok(data) => Update::Metrics {
            seq: n,
            devices: data.devices,
        },
        Err(e) => {
            tracing::warn!("metrics load failed: {e}");
            Update::Failed {
                cycle: Cycle::Fast,
                error: e.summary(),
            }
        }
    };
    tx.send(update).is_ok()
}
