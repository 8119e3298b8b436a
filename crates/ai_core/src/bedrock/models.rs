//! Foundation model listing from the Bedrock control plane

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::errors::http_error;
use crate::config::BedrockConfig;
use crate::error::InvocationError;

/// One entry of `GET /foundation-models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundationModelSummary {
    pub model_id: String,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub input_modalities: Vec<String>,
    #[serde(default)]
    pub output_modalities: Vec<String>,
    #[serde(default)]
    pub response_streaming_supported: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFoundationModelsResponse {
    #[serde(default)]
    model_summaries: Vec<FoundationModelSummary>,
}

/// Client for the model listing endpoint
#[derive(Debug, Clone)]
pub struct BedrockModelCatalog {
    client: Client,
    config: BedrockConfig,
}

impl BedrockModelCatalog {
    pub fn new(config: BedrockConfig) -> Result<Self, InvocationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InvocationError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// List every foundation model available in the region
    #[instrument(skip(self))]
    pub async fn list_foundation_models(
        &self,
    ) -> Result<Vec<FoundationModelSummary>, InvocationError> {
        let url = format!("{}/foundation-models", self.config.control_url());

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = self.config.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Listing foundation models failed");
            return Err(http_error(status, &body));
        }

        let listing: ListFoundationModelsResponse = response
            .json()
            .await
            .map_err(InvocationError::invalid_response)?;

        debug!(count = listing.model_summaries.len(), "Listed foundation models");
        Ok(listing.model_summaries)
    }
}
