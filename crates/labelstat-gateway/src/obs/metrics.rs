//! In-process metrics for the gateway.
//!
//! Two families live here:
//! - `CounterStore`: the host-managed counters the filter defines by key
//!   (winning label plus tags). Handles are plain ids handed out in
//!   definition order.
//! - `GatewayMetrics`: operational counters/histograms with dynamic labels,
//!   flattened into sorted key vectors for deterministic ordering.
//!
//! Both render Prometheus text exposition format. Histogram buckets are fixed
//! in microseconds to avoid floating point math.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use labelstat_core::error::{LabelStatError, Result};
use labelstat_core::host::CounterHandle;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>().join(",")
}

struct StoredCounter {
    key: String,
    value: AtomicU64,
}

/// Host-side counter table backing the label counters.
#[derive(Default)]
pub struct CounterStore {
    next_id: AtomicU32,
    counters: DashMap<u32, StoredCounter>,
}

impl CounterStore {
    /// Define a counter under `key` and return its handle.
    ///
    /// Every call allocates a fresh id; deduplication by key is the
    /// registry's job.
    pub fn define(&self, key: &str) -> Result<CounterHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if id == u32::MAX {
            return Err(LabelStatError::MetricCreation("counter id space exhausted".into()));
        }
        self.counters.insert(id, StoredCounter {
            key: key.to_string(),
            value: AtomicU64::new(0),
        });
        Ok(CounterHandle(id))
    }

    pub fn add(&self, handle: CounterHandle, v: u64) -> Result<()> {
        let counter = self.counters.get(&handle.0).ok_or_else(|| {
            LabelStatError::Internal(format!("unknown counter handle {}", handle.0))
        })?;
        counter.value.fetch_add(v, Ordering::Relaxed);
        Ok(())
    }

    /// Current value of the first counter defined under `key`.
    pub fn value(&self, key: &str) -> Option<u64> {
        self.counters.iter()
            .filter(|r| r.value().key == key)
            .min_by_key(|r| *r.key())
            .map(|r| r.value().value.load(Ordering::Relaxed))
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Render in Prometheus text exposition format, one series per key.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self.counters.iter()
            .map(|r| (r.value().key.clone(), r.value().value.load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (key, val) in rows {
            let _ = writeln!(out, "{}{{key=\"{}\"}} {}", name, escape_label(&key), val);
        }
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for an exact label set.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map.get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

// 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s, 30s
const BUCKETS_MICROS: [u64; 9] = [
    1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000, 5_000_000, 30_000_000,
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<Vec<(String, String)>, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets (microsecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(label_key(labels)).or_default();
        let micros = duration.as_micros() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Render in Prometheus text exposition format (unit: microseconds).
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);
            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    pub proxied_responses: CounterVec,
    pub upstream_errors: CounterVec,
    pub filter_outcomes: CounterVec,
    pub upstream_duration: HistogramVec, // In Microseconds
    draining: AtomicBool,
}

impl GatewayMetrics {
    /// Mark draining state.
    pub fn set_draining(&self) { self.draining.store(true, Ordering::Relaxed); }
    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool { self.draining.load(Ordering::Relaxed) }

    /// Render operational metrics followed by the label counters.
    pub fn render(&self, labels: &CounterStore) -> String {
        let mut out = String::new();
        self.proxied_responses.render("labelstat_proxied_responses_total", &mut out);
        self.upstream_errors.render("labelstat_upstream_errors_total", &mut out);
        self.filter_outcomes.render("labelstat_filter_outcomes_total", &mut out);
        self.upstream_duration.render("labelstat_upstream_duration_micros", &mut out);
        labels.render("labelstat_label_total", &mut out);

        let draining = if self.is_draining() { 1 } else { 0 };
        let _ = writeln!(out, "# TYPE labelstat_draining gauge\nlabelstat_draining {}", draining);
        out
    }
}
