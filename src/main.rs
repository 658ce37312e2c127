//! Main entry point for Image Label Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_label_translator::cli::commands::{self, Commands, ConfigOverrides};
use image_label_translator::TranslationStrategy;

/// Image Label Translator - labels an image and answers in Portuguese
#[derive(Parser, Debug)]
#[command(name = "image-label-translator", version, about, long_about = None)]
struct Args {
    /// JSON configuration file (defaults to environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Label detection endpoint (defaults to DETECTION_ENDPOINT env var)
    #[arg(long)]
    detection_endpoint: Option<String>,

    /// Translation endpoint (defaults to TRANSLATION_ENDPOINT env var)
    #[arg(long)]
    translation_endpoint: Option<String>,

    /// Bearer key for both services (defaults to SERVICE_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Translation strategy: per-label or joined
    #[arg(long)]
    strategy: Option<TranslationStrategy>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// `--verbose` and `server --debug` win over RUST_LOG
fn log_filter(debug: bool) -> tracing_subscriber::EnvFilter {
    let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
    if debug {
        tracing_subscriber::EnvFilter::new(format!("{}=debug", crate_target))
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{}=info", crate_target).into())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let debug_server = matches!(args.command, Some(Commands::Server { debug: true, .. }));
    let filter = log_filter(args.verbose || debug_server);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(command) = args.command else {
        println!("Please specify a command. Use --help for more information.");
        return Ok(());
    };

    // Override config with CLI args if provided
    let overrides = ConfigOverrides {
        detection_endpoint: args.detection_endpoint,
        translation_endpoint: args.translation_endpoint,
        api_key: args.api_key,
        strategy: args.strategy,
    };
    let config = commands::load_config(args.config.as_deref(), overrides)?;

    match command {
        Commands::Invoke { image_url, event } => {
            commands::handle_invoke(config, image_url, event).await?;
        }
        Commands::Server { host, port, .. } => {
            commands::handle_server(config, host, port).await?;
        }
    }

    Ok(())
}
