//! Top-level facade crate for labelstat.
//!
//! Re-exports the core filter and the gateway library so users can depend on a single crate.

pub mod core {
    pub use labelstat_core::*;
}

pub mod gateway {
    pub use labelstat_gateway::*;
}
