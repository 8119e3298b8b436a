//! Bedrock runtime client

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info, instrument, warn};

use super::errors::http_error;
use super::event_stream::create_stream;
use crate::config::BedrockConfig;
use crate::error::InvocationError;
use crate::ports::{ChunkStream, Transport};

const JSON: &str = "application/json";
const EVENT_STREAM: &str = "application/vnd.amazon.eventstream";

/// [`Transport`] backed by the Bedrock runtime HTTP API
#[derive(Debug, Clone)]
pub struct BedrockRuntimeTransport {
    client: Client,
    config: BedrockConfig,
}

impl BedrockRuntimeTransport {
    pub fn new(config: BedrockConfig) -> Result<Self, InvocationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InvocationError::Transport(format!("Failed to build HTTP client: {e}")))?;

        info!(
            endpoint = %config.runtime_url(),
            authenticated = config.bearer_token().is_some(),
            "Initialized Bedrock runtime transport"
        );

        Ok(Self { client, config })
    }

    fn invoke_url(&self, model_id: &str, streaming: bool) -> String {
        let action = if streaming {
            "invoke-with-response-stream"
        } else {
            "invoke"
        };
        format!(
            "{}/model/{}/{action}",
            self.config.runtime_url(),
            urlencoding::encode(model_id)
        )
    }

    fn request(&self, url: String, accept: &str, payload: Vec<u8>) -> RequestBuilder {
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, accept)
            .body(payload);

        match self.config.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, InvocationError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Model invocation failed");
            return Err(http_error(status, &body));
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for BedrockRuntimeTransport {
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    async fn invoke(&self, model_id: &str, payload: Vec<u8>) -> Result<Bytes, InvocationError> {
        let request = self.request(self.invoke_url(model_id, false), JSON, payload);
        let response = self.send(request).await?;

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Invocation completed");
        Ok(body)
    }

    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    async fn invoke_streaming(
        &self,
        model_id: &str,
        payload: Vec<u8>,
    ) -> Result<ChunkStream, InvocationError> {
        let request = self
            .request(self.invoke_url(model_id, true), EVENT_STREAM, payload)
            .header("X-Amzn-Bedrock-Accept", JSON);
        let response = self.send(request).await?;

        debug!("Streaming invocation started");
        Ok(create_stream(response.bytes_stream()))
    }
}
