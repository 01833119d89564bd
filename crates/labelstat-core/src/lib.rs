//! labelstat core: classifier-output extraction, the per-response body
//! handler, and the counter registry keyed by winning label.
//!
//! This crate carries no transport or runtime dependencies. Everything it
//! needs from the hosting proxy (reading announced body bytes, defining and
//! bumping counters) goes through the traits in [`host`], so the same logic
//! runs inside the gateway and inside tests with an in-memory host.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. A malformed body
//! must never take down the response path: all fallible steps surface as
//! `LabelStatError` and are recovered by the handler.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod body;
pub mod error;
pub mod host;
pub mod protocol;
pub mod registry;

/// Shared result type.
pub use error::{ErrorKind, LabelStatError, ParseError, Result};
