//! Counter registry keyed by label plus optional tags.
//!
//! Counters are created lazily on first use and reused for the lifetime of
//! the registry. Lookup-or-create goes through the `DashMap` entry API, which
//! holds the shard lock across check-then-insert, so concurrent response
//! contexts can never define the same key twice.

use std::collections::HashMap;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::Result;
use crate::host::{CounterHandle, MetricHost};

/// Unordered tag mapping appended to a metric name.
pub type Tags = HashMap<String, String>;

/// Build the registry key: `name` followed by `_<k>=<v>` per tag.
///
/// Suffix order follows map enumeration, so with more than one tag the key
/// is only stable for a given map instance.
pub fn metric_key(name: &str, tags: Option<&Tags>) -> String {
    let mut key = name.to_string();
    if let Some(tags) = tags {
        for (k, v) in tags {
            key.push('_');
            key.push_str(k);
            key.push('=');
            key.push_str(v);
        }
    }
    key
}

pub struct MetricRegistry<H> {
    host: H,
    counters: DashMap<String, CounterHandle>,
}

impl<H: MetricHost> MetricRegistry<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            counters: DashMap::new(),
        }
    }

    /// Return the handle for `name`/`tags`, defining it on the host if needed.
    ///
    /// A failed definition is not cached; the next call asks the host again.
    pub fn get_or_create(&self, name: &str, tags: Option<&Tags>) -> Result<CounterHandle> {
        let key = metric_key(name, tags);
        match self.counters.entry(key) {
            Entry::Occupied(e) => Ok(*e.get()),
            Entry::Vacant(e) => {
                let handle = self.host.define_counter(e.key())?;
                tracing::debug!(key = %e.key(), ?handle, "counter defined");
                e.insert(handle);
                Ok(handle)
            }
        }
    }

    pub fn increment(&self, handle: CounterHandle, amount: u64) -> Result<()> {
        self.host.increment_counter(handle, amount)
    }

    /// Number of distinct keys registered.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
