//! labelstat gateway
//!
//! Sits in front of a classifier model server:
//! - proxies every request upstream
//! - buffers each response body, picks the highest-scoring label
//! - counts winners per label, exported on `/metrics`

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use labelstat_gateway::{app_state::AppState, config, router};

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        return;
    }
    state.set_draining();
    tracing::info!("draining");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "labelstat.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.gateway.listen.parse()?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "labelstat-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;
    Ok(())
}
