//! Axum router wiring.
//!
//! Ops endpoints are served locally; every other path is proxied upstream
//! through the label filter.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, proxy};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .fallback(proxy::forward)
        .with_state(state)
}
