//! Application configuration
//!
//! Layered: built-in defaults, then an optional `config.toml`, then
//! `BEDROCK_CONSOLE_*` environment variables (nested keys joined with `__`,
//! e.g. `BEDROCK_CONSOLE_BEDROCK__REGION`).

use std::path::PathBuf;

use ai_core::BedrockConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BEDROCK_CONSOLE";

/// Where generated artifacts are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for generated images
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
}

fn default_image_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bedrock connection settings
    #[serde(default)]
    pub bedrock: BedrockConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `file` instead of `config.toml` when given
    ///
    /// An explicitly named file must exist.
    pub fn load_from(file: Option<&str>) -> Result<Self, config::ConfigError> {
        let file_source = match file {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("bedrock.region", "us-east-1")?
            .set_default("output.image_dir", ".")?
            .add_source(file_source)
            // Override with environment variables (e.g., BEDROCK_CONSOLE_BEDROCK__REGION)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }
}
