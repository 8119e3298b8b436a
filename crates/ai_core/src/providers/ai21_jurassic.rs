//! AI21 Labs Jurassic-2

use domain::{GenerationRequest, InvocationResult, ModelSelection, TextGeneration};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_QUESTION, ProviderCodec, extract, parse_document, to_payload};
use crate::error::InvocationError;
use crate::parameters::{ParameterSet, ParameterSpec};

static PARAMETERS: ParameterSet = ParameterSet {
    model_id: "ai21.j2-ultra",
    prompt_label: "Question",
    prompt: DEFAULT_QUESTION,
    options: &[
        ParameterSpec::float("temperature", "0.7"),
        ParameterSpec::float("topP", "1.0"),
        ParameterSpec::int("maxTokens", "200"),
        ParameterSpec::list("stopSequences"),
        ParameterSpec::float("presencePenalty", "0"),
        ParameterSpec::float("countPenalty", "0"),
        ParameterSpec::float("frequencyPenalty", "0"),
    ],
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JurassicRequest<'a> {
    prompt: &'a str,
    max_tokens: i64,
    temperature: f64,
    top_p: f64,
    stop_sequences: &'a [String],
    count_penalty: Penalty,
    presence_penalty: Penalty,
    frequency_penalty: Penalty,
}

#[derive(Debug, Serialize)]
struct Penalty {
    scale: f64,
}

#[derive(Debug, Deserialize)]
struct JurassicResponse {
    completions: Vec<Completion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Completion {
    data: CompletionData,
    #[serde(default)]
    finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
struct CompletionData {
    text: String,
    #[serde(default)]
    tokens: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct FinishReason {
    reason: String,
}

/// Codec for `ai21.j2-*`
#[derive(Debug, Default, Clone, Copy)]
pub struct Jurassic2Codec;

impl ProviderCodec for Jurassic2Codec {
    fn selection(&self) -> ModelSelection {
        ModelSelection::Jurassic2
    }

    fn parameters(&self) -> &'static ParameterSet {
        &PARAMETERS
    }

    fn encode(
        &self,
        request: &GenerationRequest,
        _streaming: bool,
    ) -> Result<Vec<u8>, InvocationError> {
        to_payload(&JurassicRequest {
            prompt: request.prompt(),
            max_tokens: request.int("maxTokens")?,
            temperature: request.float("temperature")?,
            top_p: request.float("topP")?,
            stop_sequences: request.list("stopSequences")?,
            count_penalty: Penalty {
                scale: request.float("countPenalty")?,
            },
            presence_penalty: Penalty {
                scale: request.float("presencePenalty")?,
            },
            frequency_penalty: Penalty {
                scale: request.float("frequencyPenalty")?,
            },
        })
    }

    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError> {
        let response: JurassicResponse = extract(parse_document(body)?)?;

        Ok(InvocationResult::Text(
            response
                .completions
                .into_iter()
                .map(|completion| TextGeneration {
                    text: completion.data.text,
                    token_count: completion
                        .data
                        .tokens
                        .and_then(|tokens| u32::try_from(tokens.len()).ok()),
                    finish_reason: completion.finish_reason.map(|f| f.reason),
                    input_token_count: None,
                    likelihood: None,
                })
                .collect(),
        ))
    }
}
