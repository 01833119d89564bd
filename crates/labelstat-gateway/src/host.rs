//! Gateway implementation of the core host surface.

use std::sync::Arc;

use labelstat_core::error::Result;
use labelstat_core::host::{CounterHandle, MetricHost};

use crate::obs::metrics::CounterStore;

/// Defines label counters in the shared `CounterStore`.
pub struct GatewayHost {
    store: Arc<CounterStore>,
}

impl GatewayHost {
    pub fn new(store: Arc<CounterStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CounterStore {
        &self.store
    }
}

impl MetricHost for GatewayHost {
    fn define_counter(&self, key: &str) -> Result<CounterHandle> {
        self.store.define(key)
    }

    fn increment_counter(&self, handle: CounterHandle, amount: u64) -> Result<()> {
        self.store.add(handle, amount)
    }
}
