//! labelstat gateway library entry.
//!
//! Wires config, the in-process counter host, the label filter and the
//! upstream proxy into an HTTP service. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod filter;
pub mod host;
pub mod obs;
pub mod ops;
pub mod proxy;
pub mod router;
