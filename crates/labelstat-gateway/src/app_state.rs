//! Shared application state for the labelstat gateway.
//!
//! Built once at startup and cloned into every handler. The label registry
//! lives here for the whole process; nothing ever removes a key from it.

use std::sync::Arc;
use std::time::Duration;

use labelstat_core::error::{LabelStatError, Result};
use labelstat_core::registry::{MetricRegistry, Tags};

use crate::config::GatewayConfig;
use crate::host::GatewayHost;
use crate::obs::metrics::{CounterStore, GatewayMetrics};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    registry: MetricRegistry<GatewayHost>,
    tags: Option<Tags>,
    metrics: GatewayMetrics,
    client: reqwest::Client,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.upstream.timeout_ms))
            .build()
            .map_err(|e| LabelStatError::Internal(format!("http client build failed: {e}")))?;

        let tags = if cfg.metrics.tags.is_empty() {
            None
        } else {
            Some(cfg.metrics.tags.clone())
        };

        let host = GatewayHost::new(Arc::new(CounterStore::default()));

        tracing::info!(
            upstream = %cfg.upstream.url,
            tags = tags.as_ref().map(|t| t.len()).unwrap_or(0),
            "label filter ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry: MetricRegistry::new(host),
                tags,
                metrics: GatewayMetrics::default(),
                client,
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricRegistry<GatewayHost> {
        &self.inner.registry
    }

    pub fn tags(&self) -> Option<&Tags> {
        self.inner.tags.as_ref()
    }

    /// Host-side label counters.
    pub fn labels(&self) -> &CounterStore {
        self.inner.registry.host().store()
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.inner.client
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }
}
