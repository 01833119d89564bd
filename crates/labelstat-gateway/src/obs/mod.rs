//! Lightweight in-process metrics.
//!
//! Label counters and gateway operational metrics are stored as atomics and
//! rendered by the `/metrics` handler.

pub mod metrics;
