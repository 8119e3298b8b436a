//! Meta Llama 2 chat models

use domain::{GenerationRequest, InvocationResult, ModelSelection, StreamEvent, TextGeneration};
use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_QUESTION, ProviderCodec, StreamTermination, extract, parse_chunk, parse_document,
    to_payload,
};
use crate::error::InvocationError;
use crate::parameters::{ParameterSet, ParameterSpec};

static PARAMETERS: ParameterSet = ParameterSet {
    model_id: "meta.llama2-13b-chat-v1",
    prompt_label: "Question",
    prompt: DEFAULT_QUESTION,
    options: &[
        ParameterSpec::float("temperature", "0.5"),
        ParameterSpec::float("top_p", "0.9"),
        ParameterSpec::int("max_gen_len", "512"),
    ],
};

#[derive(Debug, Serialize)]
struct LlamaRequest<'a> {
    prompt: &'a str,
    temperature: f64,
    top_p: f64,
    max_gen_len: i64,
}

/// Shared by complete responses and stream chunks
#[derive(Debug, Deserialize)]
struct LlamaGeneration {
    #[serde(default)]
    generation: String,
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    generation_token_count: Option<u32>,
    #[serde(default)]
    stop_reason: Option<String>,
}

/// Codec for `meta.llama2-*`
#[derive(Debug, Default, Clone, Copy)]
pub struct Llama2Codec;

impl ProviderCodec for Llama2Codec {
    fn selection(&self) -> ModelSelection {
        ModelSelection::Llama2
    }

    fn parameters(&self) -> &'static ParameterSet {
        &PARAMETERS
    }

    fn encode(
        &self,
        request: &GenerationRequest,
        _streaming: bool,
    ) -> Result<Vec<u8>, InvocationError> {
        to_payload(&LlamaRequest {
            prompt: request.prompt(),
            temperature: request.float("temperature")?,
            top_p: request.float("top_p")?,
            max_gen_len: request.int("max_gen_len")?,
        })
    }

    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError> {
        let document = parse_document(body)?;
        if document.get("generation").is_none() {
            return Err(InvocationError::invalid_response("missing field `generation`"));
        }
        let response: LlamaGeneration = extract(document)?;

        Ok(InvocationResult::Text(vec![TextGeneration {
            text: response.generation,
            token_count: response.generation_token_count,
            finish_reason: response.stop_reason,
            input_token_count: response.prompt_token_count,
            likelihood: None,
        }]))
    }

    fn stream_termination(&self) -> Option<StreamTermination> {
        Some(StreamTermination::TransportClose)
    }

    fn decode_chunk(&self, chunk: &[u8]) -> Result<StreamEvent, InvocationError> {
        let chunk: LlamaGeneration = parse_chunk(chunk)?;
        Ok(StreamEvent::new(chunk.generation)
            .with_final(chunk.stop_reason.is_some())
            .with_token_counts(chunk.prompt_token_count, chunk.generation_token_count))
    }
}
