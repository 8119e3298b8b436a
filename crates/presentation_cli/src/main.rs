//! Bedrock Console
//!
//! Interactive harness for Amazon Bedrock foundation models: pick a model
//! family, answer its parameter questions and see the decoded answer.

#![allow(clippy::print_stdout)]

mod console;
mod menu;
mod render;

use std::io::{self, BufReader};
use std::sync::Arc;

use ai_core::{BedrockModelCatalog, BedrockRuntimeTransport, Catalog};
use clap::{Parser, Subcommand};
use domain::ModelSelection;
use infrastructure::{AppConfig, FileImageSink, StdinInputSource};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::console::Console;

/// Bedrock Console
#[derive(Parser)]
#[command(name = "bedrock-console")]
#[command(author, version, about = "Amazon Bedrock foundation model console", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<String>,

    /// AWS region, overrides the configuration
    #[arg(long)]
    region: Option<String>,

    /// Bedrock API key used as bearer token
    #[arg(long, env = "AWS_BEARER_TOKEN_BEDROCK", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory for generated images, overrides the configuration
    #[arg(long)]
    image_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive numbered menu (default)
    Menu,

    /// Invoke one model family, answering its questions on stdin
    Invoke {
        /// Selection key, e.g. titan-text, claude, sdxl, cohere-embed
        selection: String,

        /// Print the answer as it is generated
        #[arg(short, long)]
        stream: bool,
    },

    /// List the foundation models of the region
    Models,

    /// List the selection keys
    Selections,
}

/// Convert verbosity count to log filter string
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(region) = &cli.region {
        config.bedrock.region.clone_from(region);
    }
    if let Some(key) = &cli.api_key {
        config.bedrock = config.bedrock.with_api_key(key.clone());
    }
    if let Some(dir) = &cli.image_dir {
        config.output.image_dir = dir.into();
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = apply_overrides(AppConfig::load_from(cli.config.as_deref())?, &cli);
    debug!(config = ?config, "Starting console");

    let transport = BedrockRuntimeTransport::new(config.bedrock.clone())?;
    let models = BedrockModelCatalog::new(config.bedrock.clone())?;
    let images = FileImageSink::new(config.output.image_dir.clone());
    let catalog = Catalog::new(Arc::new(transport), Arc::new(images));

    let mut console = Console::new(
        catalog,
        models,
        StdinInputSource::with_io(BufReader::new(io::stdin()), io::stdout()),
        io::stdout(),
        config.output.image_dir,
    );

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => console.run_menu().await?,
        Commands::Invoke { selection, stream } => {
            let selection: ModelSelection = selection.parse()?;
            console.invoke(selection, stream).await?;
        },
        Commands::Models => console.list_models().await?,
        Commands::Selections => {
            for selection in ModelSelection::ALL {
                println!(
                    "{:<16} {:<26} {}",
                    selection.config_key(),
                    selection.display_name(),
                    selection.modality()
                );
            }
        },
    }

    Ok(())
}
