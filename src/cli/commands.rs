//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::config::HandlerConfig;
use crate::core::handler::Handler;
use crate::core::models::{InvocationEvent, TranslationStrategy};

/// Commands for Image Label Translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single invocation and print the response
    Invoke {
        /// Image URL to label
        #[arg(short, long, conflicts_with = "event", required_unless_present = "event")]
        image_url: Option<String>,

        /// JSON file holding a full invocation event
        #[arg(short, long)]
        event: Option<PathBuf>,
    },

    /// Start HTTP API server
    Server {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },
}

/// Global flags that take precedence over the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub detection_endpoint: Option<String>,
    pub translation_endpoint: Option<String>,
    pub api_key: Option<String>,
    pub strategy: Option<TranslationStrategy>,
}

impl ConfigOverrides {
    /// Apply every flag that was given
    pub fn apply(self, config: &mut HandlerConfig) {
        if let Some(endpoint) = self.detection_endpoint {
            config.detection_endpoint = endpoint;
        }
        if let Some(endpoint) = self.translation_endpoint {
            config.translation_endpoint = endpoint;
        }
        if let Some(api_key) = self.api_key {
            config.api_key = Some(api_key);
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
    }
}

/// Load configuration from `--config` when given, else from the environment
pub fn load_config(
    config_file: Option<&Path>,
    overrides: ConfigOverrides,
) -> anyhow::Result<HandlerConfig> {
    let mut config = match config_file {
        Some(path) => HandlerConfig::from_file(path)?,
        None => HandlerConfig::from_env()?,
    };
    overrides.apply(&mut config);
    Ok(config)
}

/// Build the invocation event from CLI input
pub fn load_event(image_url: Option<String>, event: Option<PathBuf>) -> anyhow::Result<InvocationEvent> {
    match (image_url, event) {
        (Some(url), _) => Ok(InvocationEvent::for_image(url)),
        (None, Some(path)) => {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&content)?)
        }
        (None, None) => anyhow::bail!("either --image-url or --event is required"),
    }
}

/// Handle invoke command
pub async fn handle_invoke(
    config: HandlerConfig,
    image_url: Option<String>,
    event: Option<PathBuf>,
) -> anyhow::Result<()> {
    let event = load_event(image_url, event)?;
    let handler = Handler::from_config(&config)?;

    info!("Invoking with {} translation strategy", config.strategy);

    let response = handler.handle(&event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

/// Handle server command
pub async fn handle_server(
    config: HandlerConfig,
    host: String,
    port: u16,
) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    let handler = Handler::from_config(&config)?;

    info!("Starting HTTP server on {}:{}", host, port);
    println!("🚀 Server starting on http://{}:{}", host, port);
    println!("   Try: http://{}:{}/?imageUrl=<url>", host, port);

    run_server(host, port, handler).await?;

    Ok(())
}
