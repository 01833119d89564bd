//! In-memory host used by the integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use labelstat_core::host::{CounterHandle, MetricHost};
use labelstat_core::{LabelStatError, Result};

/// Counter table indexed by handle id.
#[derive(Default)]
pub struct MemoryHost {
    counters: Mutex<Vec<(String, u64)>>,
    fail_define: AtomicBool,
}

impl MemoryHost {
    pub fn failing() -> Self {
        let host = Self::default();
        host.fail_define.store(true, Ordering::Relaxed);
        host
    }

    pub fn set_failing(&self, on: bool) {
        self.fail_define.store(on, Ordering::Relaxed);
    }

    /// Number of `define_counter` calls that succeeded.
    pub fn defined(&self) -> usize {
        self.counters.lock().unwrap().len()
    }

    pub fn value(&self, key: &str) -> Option<u64> {
        self.counters
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn total(&self) -> u64 {
        self.counters.lock().unwrap().iter().map(|(_, v)| v).sum()
    }
}

impl MetricHost for MemoryHost {
    fn define_counter(&self, key: &str) -> Result<CounterHandle> {
        if self.fail_define.load(Ordering::Relaxed) {
            return Err(LabelStatError::MetricCreation(format!("host refused {key}")));
        }
        let mut counters = self.counters.lock().unwrap();
        counters.push((key.to_string(), 0));
        Ok(CounterHandle((counters.len() - 1) as u32))
    }

    fn increment_counter(&self, handle: CounterHandle, amount: u64) -> Result<()> {
        let mut counters = self.counters.lock().unwrap();
        let slot = counters
            .get_mut(handle.0 as usize)
            .ok_or_else(|| LabelStatError::Internal(format!("unknown counter {}", handle.0)))?;
        slot.1 += amount;
        Ok(())
    }
}

/// Records the level of every event emitted while installed.
#[derive(Clone, Default)]
pub struct EventLevels(Arc<Mutex<Vec<Level>>>);

impl EventLevels {
    pub fn count(&self, level: Level) -> usize {
        self.0.lock().unwrap().iter().filter(|l| **l == level).count()
    }
}

impl<S: Subscriber> Layer<S> for EventLevels {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.0.lock().unwrap().push(*event.metadata().level());
    }
}

/// Run `f` with a thread-local subscriber and return the levels it logged.
pub fn capture_events<F: FnOnce()>(f: F) -> EventLevels {
    let levels = EventLevels::default();
    let subscriber = tracing_subscriber::registry().with(levels.clone());
    tracing::subscriber::with_default(subscriber, f);
    levels
}
