//! Amazon Titan text generation

use domain::{GenerationRequest, InvocationResult, ModelSelection, StreamEvent, TextGeneration};
use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_QUESTION, ProviderCodec, StreamTermination, check_error_field, extract, parse_chunk,
    parse_document, to_payload,
};
use crate::error::InvocationError;
use crate::parameters::{ParameterSet, ParameterSpec};

static PARAMETERS: ParameterSet = ParameterSet {
    model_id: "amazon.titan-text-express-v1",
    prompt_label: "Question",
    prompt: DEFAULT_QUESTION,
    options: &[
        ParameterSpec::float("temperature", "0.9"),
        ParameterSpec::float("topP", "1.0"),
        ParameterSpec::int("maxTokenCount", "512"),
        ParameterSpec::list("stopSequences"),
    ],
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanTextRequest<'a> {
    input_text: &'a str,
    text_generation_config: TextGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextGenerationConfig<'a> {
    max_token_count: i64,
    stop_sequences: &'a [String],
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanTextResponse {
    #[serde(default)]
    input_text_token_count: Option<u32>,
    results: Vec<TitanTextResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanTextResult {
    output_text: String,
    #[serde(default)]
    token_count: Option<u32>,
    #[serde(default)]
    completion_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanTextChunk {
    #[serde(default)]
    output_text: String,
    #[serde(default)]
    total_output_text_token_count: Option<u32>,
    #[serde(default)]
    input_text_token_count: Option<u32>,
    #[serde(default)]
    completion_reason: Option<String>,
}

/// Codec for `amazon.titan-text-*`
#[derive(Debug, Default, Clone, Copy)]
pub struct TitanTextCodec;

impl ProviderCodec for TitanTextCodec {
    fn selection(&self) -> ModelSelection {
        ModelSelection::TitanText
    }

    fn parameters(&self) -> &'static ParameterSet {
        &PARAMETERS
    }

    fn encode(
        &self,
        request: &GenerationRequest,
        _streaming: bool,
    ) -> Result<Vec<u8>, InvocationError> {
        to_payload(&TitanTextRequest {
            input_text: request.prompt(),
            text_generation_config: TextGenerationConfig {
                max_token_count: request.int("maxTokenCount")?,
                stop_sequences: request.list("stopSequences")?,
                temperature: request.float("temperature")?,
                top_p: request.float("topP")?,
            },
        })
    }

    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError> {
        let document = parse_document(body)?;
        check_error_field(&document, "Text Generation Error")?;
        let response: TitanTextResponse = extract(document)?;
        let input_token_count = response.input_text_token_count;

        Ok(InvocationResult::Text(
            response
                .results
                .into_iter()
                .map(|result| TextGeneration {
                    text: result.output_text,
                    token_count: result.token_count,
                    finish_reason: result.completion_reason,
                    input_token_count,
                    likelihood: None,
                })
                .collect(),
        ))
    }

    fn stream_termination(&self) -> Option<StreamTermination> {
        Some(StreamTermination::FinalMarker)
    }

    fn decode_chunk(&self, chunk: &[u8]) -> Result<StreamEvent, InvocationError> {
        let chunk: TitanTextChunk = parse_chunk(chunk)?;
        Ok(StreamEvent::new(chunk.output_text)
            .with_final(chunk.completion_reason.is_some())
            .with_token_counts(
                chunk.input_text_token_count,
                chunk.total_output_text_token_count,
            ))
    }
}
