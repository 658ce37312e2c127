//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::core::errors::{PipelineError, Result};
use crate::core::models::TranslationStrategy;

/// Configuration for the label handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub detection_endpoint: String,
    pub translation_endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    #[serde(default)]
    pub strategy: TranslationStrategy,
}

impl HandlerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let detection_endpoint = std::env::var("DETECTION_ENDPOINT")
            .map_err(|_| anyhow::anyhow!("DETECTION_ENDPOINT environment variable is required"))?;

        let translation_endpoint = std::env::var("TRANSLATION_ENDPOINT")
            .map_err(|_| anyhow::anyhow!("TRANSLATION_ENDPOINT environment variable is required"))?;

        let api_key = std::env::var("SERVICE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse::<u64>()?;

        let strategy = std::env::var("TRANSLATION_STRATEGY")
            .unwrap_or_else(|_| "per-label".to_string())
            .parse::<TranslationStrategy>()
            .map_err(|e| anyhow::anyhow!(e))?;

        info!("Loaded configuration with {} translation strategy", strategy);

        Ok(Self {
            detection_endpoint,
            translation_endpoint,
            api_key,
            timeout_ms,
            strategy,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        info!(
            "Loaded configuration from {} with {} translation strategy",
            path.as_ref().display(),
            config.strategy
        );
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, endpoint) in [
            ("detection_endpoint", &self.detection_endpoint),
            ("translation_endpoint", &self.translation_endpoint),
        ] {
            if endpoint.is_empty() {
                return Err(PipelineError::config(format!("{} is required", name)));
            }
            url::Url::parse(endpoint)
                .map_err(|e| PipelineError::config(format!("{} is not a valid URL: {}", name, e)))?;
        }

        if self.timeout_ms == 0 {
            return Err(PipelineError::config("timeout_ms must be greater than 0"));
        }

        Ok(())
    }
}
