//! Structured logging setup
//!
//! One `tracing-subscriber` registry with an `EnvFilter` (from `RUST_LOG`,
//! falling back to [`DEFAULT_FILTER`]) and either JSON or human-readable
//! output.

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str = "roi_api=debug,roi_calculator=info,tower_http=info";

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub service_name: String,
    pub service_version: String,
    /// Environment (dev, staging, prod)
    pub environment: String,
    /// Emit one JSON object per event instead of formatted lines
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "roi-api".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
            json_output: false,
        }
    }
}

impl TracingConfig {
    pub fn from_environment() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            service_name: lookup("ROI_SERVICE_NAME").unwrap_or(defaults.service_name),
            service_version: defaults.service_version,
            environment: lookup("ROI_ENVIRONMENT").unwrap_or(defaults.environment),
            json_output: lookup("ROI_LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.json_output),
        }
    }
}

pub fn init_tracing(config: TracingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let (json_layer, text_layer) = if config.json_output {
        (Some(fmt::layer().json().with_target(false)), None)
    } else {
        (None, Some(fmt::layer().with_target(false)))
    };

    tracing_subscriber::registry().with(filter).with(json_layer).with(text_layer).try_init()?;

    info!(
        service_name = %config.service_name,
        service_version = %config.service_version,
        environment = %config.environment,
        json = config.json_output,
        "Tracing initialized"
    );
    Ok(())
}
