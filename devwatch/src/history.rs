//! Bounded history of aggregate CPU / memory samples for the dashboard charts.

use std::collections::VecDeque;

use crate::types::{DetailHistory, Device};

/// Points kept per chart.
pub const HISTORY_CAP: usize = 20;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    dq.push_back(v);
    if dq.len() > cap {
        dq.pop_front();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub timestamp: String,
    pub cpu: u64,
    pub memory: u64,
}

/// Mean CPU and memory across online devices that reported a CPU value.
///
/// Returns `None` when no device qualifies, in which case the tick is skipped.
/// A missing memory reading counts as 0 but does not exclude the device.
pub fn aggregate(devices: &[Device], timestamp: impl Into<String>) -> Option<Sample> {
    let mut n = 0usize;
    let mut cpu_sum = 0.0_f64;
    let mut mem_sum = 0.0_f64;
    for d in devices.iter().filter(|d| d.status.is_online()) {
        let Some(cpu) = d.cpu else { continue };
        n += 1;
        cpu_sum += cpu;
        mem_sum += d.memory.unwrap_or(0.0);
    }
    if n == 0 {
        return None;
    }
    Some(Sample {
        timestamp: timestamp.into(),
        cpu: pct(cpu_sum / n as f64),
        memory: pct(mem_sum / n as f64),
    })
}

fn pct(v: f64) -> u64 {
    v.clamp(0.0, 100.0).round() as u64
}

// Keeps the most recent samples with a fixed capacity
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Sample>,
    cap: usize,
}

impl History {
    pub fn new(cap: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    /// History of a single device as the backend reports it. Points without a CPU
    /// reading are gaps and are skipped; a missing memory reading counts as 0.
    pub fn from_detail(h: &DetailHistory) -> Self {
        let mut out = Self::default();
        for (i, ts) in h.timestamps.iter().enumerate() {
            let Some(cpu) = h.cpu.get(i).copied().flatten() else {
                continue;
            };
            let memory = h.memory.get(i).copied().flatten().unwrap_or(0.0);
            out.append(Sample {
                timestamp: ts.clone(),
                cpu: pct(cpu),
                memory: pct(memory),
            });
        }
        out
    }

    pub fn append(&mut self, sample: Sample) {
        push_capped(&mut self.samples, sample, self.cap);
    }

    /// Aggregate `devices` and append the result; the buffer is untouched when nothing qualifies.
    pub fn record(&mut self, devices: &[Device], timestamp: impl Into<String>) -> Option<&Sample> {
        let sample = aggregate(devices, timestamp)?;
        self.append(sample);
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.samples.iter().map(|s| s.timestamp.clone()).collect()
    }

    pub fn cpu_series(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.cpu).collect()
    }

    pub fn memory_series(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.memory).collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceStatus;

    fn dev(status: DeviceStatus, cpu: Option<f64>, memory: Option<f64>) -> Device {
        Device {
            id: "d".into(),
            name: "d".into(),
            ip: "10.0.0.1".into(),
            vendor: "Huawei".into(),
            port: Some(22),
            status,
            cpu,
            memory,
            temperature: None,
        }
    }

    fn sample(i: u64) -> Sample {
        Sample {
            timestamp: format!("t{i}"),
            cpu: i % 101,
            memory: (i * 3) % 101,
        }
    }

    #[test]
    fn length_never_exceeds_cap_and_last_is_newest() {
        let mut h = History::default();
        for i in 0..57 {
            h.append(sample(i));
            assert!(h.len() <= HISTORY_CAP);
            assert_eq!(h.latest(), Some(&sample(i)));
        }
    }

    #[test]
    fn overflow_keeps_last_n_in_order() {
        let mut h = History::new(20);
        for i in 0..35 {
            h.append(sample(i));
        }
        let got: Vec<Sample> = h.iter().cloned().collect();
        let want: Vec<Sample> = (15..35).map(sample).collect();
        assert_eq!(got, want);
        assert_eq!(h.labels().len(), h.cpu_series().len());
        assert_eq!(h.cpu_series().len(), h.memory_series().len());
    }

    #[test]
    fn no_online_devices_leaves_buffer_unchanged() {
        let mut h = History::default();
        h.append(sample(1));
        let before: Vec<Sample> = h.iter().cloned().collect();
        let devices = vec![
            dev(DeviceStatus::Offline, Some(40.0), Some(10.0)),
            dev(DeviceStatus::Unknown, Some(80.0), None),
            dev(DeviceStatus::Online, None, Some(50.0)),
        ];
        assert!(h.record(&devices, "12:00:00").is_none());
        let after: Vec<Sample> = h.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn mean_ignores_offline_devices() {
        let devices = vec![
            dev(DeviceStatus::Online, Some(50.0), Some(20.0)),
            dev(DeviceStatus::Online, Some(70.0), Some(40.0)),
            dev(DeviceStatus::Offline, Some(90.0), Some(90.0)),
        ];
        let s = aggregate(&devices, "12:00:30").unwrap();
        assert_eq!(s.cpu, 60);
        assert_eq!(s.memory, 30);
        assert_eq!(s.timestamp, "12:00:30");
    }

    #[test]
    fn missing_memory_counts_as_zero() {
        let devices = vec![
            dev(DeviceStatus::Online, Some(10.0), None),
            dev(DeviceStatus::Online, Some(21.0), Some(45.0)),
        ];
        let s = aggregate(&devices, "t").unwrap();
        // (10 + 21) / 2 = 15.5 rounds up; memory (0 + 45) / 2 = 22.5 rounds up
        assert_eq!(s.cpu, 16);
        assert_eq!(s.memory, 23);
    }

    #[test]
    fn detail_series_skip_gaps() {
        let h = DetailHistory {
            timestamps: (0..25).map(|i| format!("t{i}")).collect(),
            cpu: (0..25).map(|i| if i == 24 { None } else { Some(i as f64 * 4.2) }).collect(),
            memory: vec![None; 25],
        };
        let hist = History::from_detail(&h);
        // 24 points with cpu, capped to the newest 20
        assert_eq!(hist.len(), HISTORY_CAP);
        assert_eq!(hist.labels().first().map(String::as_str), Some("t4"));
        assert_eq!(hist.latest().map(|s| (s.cpu, s.memory)), Some((97, 0)));

        let empty = History::from_detail(&DetailHistory {
            timestamps: vec!["a".into()],
            cpu: vec![None],
            memory: vec![Some(30.0)],
        });
        assert!(empty.is_empty());
    }
}
