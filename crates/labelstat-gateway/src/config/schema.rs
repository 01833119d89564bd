use std::collections::HashMap;

use serde::Deserialize;
use labelstat_core::error::{LabelStatError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub upstream: UpstreamSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LabelStatError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.upstream.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.trim().is_empty() {
            return Err(LabelStatError::BadConfig("gateway.listen must not be empty".into()));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// Model server the gateway fronts.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    pub url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Largest response body buffered for inspection. Bigger bodies are
    /// streamed through without a label count.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl UpstreamSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(LabelStatError::BadConfig(
                "upstream.url must start with http:// or https://".into(),
            ));
        }
        if !(100..=300_000).contains(&self.timeout_ms) {
            return Err(LabelStatError::BadConfig(
                "upstream.timeout_ms must be between 100 and 300000".into(),
            ));
        }
        if !(1024..=268_435_456).contains(&self.max_body_bytes) {
            return Err(LabelStatError::BadConfig(
                "upstream.max_body_bytes must be between 1024 and 268435456".into(),
            ));
        }
        Ok(())
    }

    /// Base url without a trailing slash, ready for path concatenation.
    pub fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}
fn default_max_body_bytes() -> usize {
    4 * 1024 * 1024
}

/// Counter naming options.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Static tags appended to every label counter key.
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        for (k, v) in &self.tags {
            if k.is_empty() || v.is_empty() {
                return Err(LabelStatError::BadConfig(
                    "metrics.tags keys and values must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}
