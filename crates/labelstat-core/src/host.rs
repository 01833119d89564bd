//! Host collaborator surface.
//!
//! The proxy that embeds the filter owns body delivery and the counter
//! backend. Diagnostics are not part of this surface: the core emits
//! `tracing` events and the host decides where they go.

use bytes::Bytes;

use crate::error::{LabelStatError, Result};

/// Opaque handle to a host-managed monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterHandle(pub u32);

/// Host-side counter backend.
pub trait MetricHost: Send + Sync {
    /// Define a new counter under `key`.
    fn define_counter(&self, key: &str) -> Result<CounterHandle>;
    /// Add `amount` to the counter behind `handle`.
    fn increment_counter(&self, handle: CounterHandle, amount: u64) -> Result<()>;
}

/// Access to the response body bytes the host has announced so far.
pub trait BodySource {
    fn read_body(&self, offset: usize, len: usize) -> Result<Bytes>;
}

/// Contiguous buffers are their own body source.
impl BodySource for [u8] {
    fn read_body(&self, offset: usize, len: usize) -> Result<Bytes> {
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= self.len())
            .ok_or_else(|| {
                LabelStatError::BodyRead(format!(
                    "range {offset}+{len} exceeds {} buffered bytes",
                    self.len()
                ))
            })?;
        Ok(Bytes::copy_from_slice(&self[offset..end]))
    }
}
