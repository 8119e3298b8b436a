//! Anthropic Claude text completions

use domain::{GenerationRequest, InvocationResult, ModelSelection, StreamEvent, TextGeneration};
use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_QUESTION, InvocationMetrics, ProviderCodec, StreamTermination, extract, parse_chunk,
    parse_document, to_payload,
};
use crate::error::InvocationError;
use crate::parameters::{ParameterSet, ParameterSpec};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

static PARAMETERS: ParameterSet = ParameterSet {
    model_id: "anthropic.claude-v2",
    prompt_label: "Question",
    prompt: DEFAULT_QUESTION,
    options: &[
        ParameterSpec::float("temperature", "1.0"),
        ParameterSpec::float("top_p", "1.0"),
        ParameterSpec::int("top_k", "250"),
        ParameterSpec::int("max_tokens_to_sample", "200"),
        ParameterSpec::list("stop_sequences"),
    ],
};

#[derive(Debug, Serialize)]
struct ClaudeRequest<'a> {
    prompt: String,
    temperature: f64,
    top_p: f64,
    top_k: i64,
    max_tokens_to_sample: i64,
    stop_sequences: &'a [String],
    anthropic_version: &'static str,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    completion: String,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClaudeChunk {
    #[serde(default)]
    completion: String,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(rename = "amazon-bedrock-invocationMetrics", default)]
    metrics: Option<InvocationMetrics>,
}

/// Wrap a question in the Human/Assistant turn format
fn conversation_prompt(question: &str) -> String {
    format!("\n\nHuman: {question}\n\nAssistant:")
}

/// Codec for `anthropic.claude-*` text completions
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaudeCodec;

impl ProviderCodec for ClaudeCodec {
    fn selection(&self) -> ModelSelection {
        ModelSelection::Claude
    }

    fn parameters(&self) -> &'static ParameterSet {
        &PARAMETERS
    }

    fn encode(
        &self,
        request: &GenerationRequest,
        _streaming: bool,
    ) -> Result<Vec<u8>, InvocationError> {
        to_payload(&ClaudeRequest {
            prompt: conversation_prompt(request.prompt()),
            temperature: request.float("temperature")?,
            top_p: request.float("top_p")?,
            top_k: request.int("top_k")?,
            max_tokens_to_sample: request.int("max_tokens_to_sample")?,
            stop_sequences: request.list("stop_sequences")?,
            anthropic_version: ANTHROPIC_VERSION,
        })
    }

    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError> {
        let response: ClaudeResponse = extract(parse_document(body)?)?;
        Ok(InvocationResult::Text(vec![TextGeneration {
            text: response.completion,
            token_count: None,
            finish_reason: response.stop_reason,
            input_token_count: None,
            likelihood: None,
        }]))
    }

    fn stream_termination(&self) -> Option<StreamTermination> {
        Some(StreamTermination::FinalMarker)
    }

    fn decode_chunk(&self, chunk: &[u8]) -> Result<StreamEvent, InvocationError> {
        let chunk: ClaudeChunk = parse_chunk(chunk)?;
        let metrics = chunk.metrics.unwrap_or_default();
        Ok(StreamEvent::new(chunk.completion)
            .with_final(chunk.stop_reason.is_some())
            .with_token_counts(metrics.input_token_count, metrics.output_token_count))
    }
}
