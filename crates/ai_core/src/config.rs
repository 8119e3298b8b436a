//! Configuration for the Bedrock clients

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Connection settings for Amazon Bedrock
#[derive(Clone, Serialize, Deserialize)]
pub struct BedrockConfig {
    /// AWS region hosting the models
    #[serde(default = "default_region")]
    pub region: String,

    /// Override for the runtime endpoint (invocations)
    #[serde(default)]
    pub runtime_endpoint: Option<String>,

    /// Override for the control plane endpoint (model listing)
    #[serde(default)]
    pub control_endpoint: Option<String>,

    /// Bedrock API key, sent as a bearer token
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

const fn default_timeout_ms() -> u64 {
    120_000
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            runtime_endpoint: None,
            control_endpoint: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl std::fmt::Debug for BedrockConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockConfig")
            .field("region", &self.region)
            .field("runtime_endpoint", &self.runtime_endpoint)
            .field("control_endpoint", &self.control_endpoint)
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl BedrockConfig {
    /// Config for a region with regional endpoints
    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Base URL for model invocations
    #[must_use]
    pub fn runtime_url(&self) -> String {
        self.runtime_endpoint.as_deref().map_or_else(
            || format!("https://bedrock-runtime.{}.amazonaws.com", self.region),
            |endpoint| endpoint.trim_end_matches('/').to_string(),
        )
    }

    /// Base URL for the control plane
    #[must_use]
    pub fn control_url(&self) -> String {
        self.control_endpoint.as_deref().map_or_else(
            || format!("https://bedrock.{}.amazonaws.com", self.region),
            |endpoint| endpoint.trim_end_matches('/').to_string(),
        )
    }

    /// Bearer token, if one is configured and not blank
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|token| !token.trim().is_empty())
    }
}
