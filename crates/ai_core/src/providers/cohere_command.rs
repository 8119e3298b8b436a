//! Cohere Command text generation

use domain::{GenerationRequest, InvocationResult, ModelSelection, StreamEvent, TextGeneration};
use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_QUESTION, InvocationMetrics, ProviderCodec, StreamTermination, extract, parse_chunk,
    parse_document, to_payload,
};
use crate::error::InvocationError;
use crate::parameters::{ParameterSet, ParameterSpec};

static PARAMETERS: ParameterSet = ParameterSet {
    model_id: "cohere.command-text-v14",
    prompt_label: "Question",
    prompt: DEFAULT_QUESTION,
    options: &[
        ParameterSpec::float("temperature", "0.75"),
        ParameterSpec::float("p", "0.01"),
        ParameterSpec::int("k", "0"),
        ParameterSpec::int("max_tokens", "400"),
        ParameterSpec::list("stop_sequences"),
        ParameterSpec::text("return_likelihoods", "NONE"),
        ParameterSpec::int("num_generations", "2"),
    ],
};

#[derive(Debug, Serialize)]
struct CommandRequest<'a> {
    prompt: &'a str,
    temperature: f64,
    p: f64,
    k: i64,
    max_tokens: i64,
    stop_sequences: &'a [String],
    return_likelihoods: &'a str,
    num_generations: i64,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
    /// Present when `return_likelihoods` is `GENERATION` or `ALL`
    #[serde(default)]
    likelihood: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CommandChunk {
    #[serde(default)]
    text: String,
    #[serde(default)]
    is_finished: bool,
    #[serde(rename = "amazon-bedrock-invocationMetrics", default)]
    metrics: Option<InvocationMetrics>,
}

/// Codec for `cohere.command-*`
///
/// The only provider whose request body carries the stream flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct CohereCommandCodec;

impl ProviderCodec for CohereCommandCodec {
    fn selection(&self) -> ModelSelection {
        ModelSelection::CohereCommand
    }

    fn parameters(&self) -> &'static ParameterSet {
        &PARAMETERS
    }

    fn encode(
        &self,
        request: &GenerationRequest,
        streaming: bool,
    ) -> Result<Vec<u8>, InvocationError> {
        to_payload(&CommandRequest {
            prompt: request.prompt(),
            temperature: request.float("temperature")?,
            p: request.float("p")?,
            k: request.int("k")?,
            max_tokens: request.int("max_tokens")?,
            stop_sequences: request.list("stop_sequences")?,
            return_likelihoods: request.text("return_likelihoods")?,
            num_generations: request.int("num_generations")?,
            stream: streaming,
        })
    }

    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError> {
        let response: CommandResponse = extract(parse_document(body)?)?;

        Ok(InvocationResult::Text(
            response
                .generations
                .into_iter()
                .map(|generation| TextGeneration {
                    text: generation.text,
                    token_count: None,
                    finish_reason: generation.finish_reason,
                    input_token_count: None,
                    likelihood: generation.likelihood,
                })
                .collect(),
        ))
    }

    fn stream_termination(&self) -> Option<StreamTermination> {
        Some(StreamTermination::FinalMarker)
    }

    fn decode_chunk(&self, chunk: &[u8]) -> Result<StreamEvent, InvocationError> {
        let chunk: CommandChunk = parse_chunk(chunk)?;
        let metrics = chunk.metrics.unwrap_or_default();
        Ok(StreamEvent::new(chunk.text)
            .with_final(chunk.is_finished)
            .with_token_counts(metrics.input_token_count, metrics.output_token_count))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::providers::test_support::default_payload;

    #[test]
    fn default_payload_matches_documented_defaults() {
        assert_eq!(
            default_payload(&CohereCommandCodec, false),
            json!({
                "prompt": "Why do we dream?",
                "temperature": 0.75,
                "p": 0.01,
                "k": 0,
                "max_tokens": 400,
                "stop_sequences": [],
                "return_likelihoods": "NONE",
                "num_generations": 2,
                "stream": false
            })
        );
    }

    #[test]
    fn streaming_sets_the_stream_flag() {
        assert_eq!(default_payload(&CohereCommandCodec, true)["stream"], json!(true));
    }

    #[test]
    fn decodes_generations_in_order() {
        let body = br#"{"id":"abc","prompt":"Why do we dream?","generations":[
            {"id":"g1","text":"first","finish_reason":"COMPLETE"},
            {"id":"g2","text":"second","finish_reason":"MAX_TOKENS","likelihood":-1.5}
        ]}"#;
        let result = CohereCommandCodec.decode_sync(body).unwrap();
        let texts: Vec<_> = result
            .as_text()
            .unwrap()
            .iter()
            .map(|g| g.text.as_str())
            .collect();
        assert_eq!(texts, ["first", "second"]);
        assert_eq!(
            result.as_text().unwrap()[1].finish_reason.as_deref(),
            Some("MAX_TOKENS")
        );
    }

    #[test]
    fn requested_likelihoods_are_kept() {
        let body = br#"{"generations":[
            {"text":"Dreams consolidate memory.","finish_reason":"COMPLETE","likelihood":-12.25,
             "token_likelihoods":[{"token":"Dreams","likelihood":-3.5}]},
            {"text":"Nobody knows.","finish_reason":"COMPLETE"}
        ]}"#;
        let result = CohereCommandCodec.decode_sync(body).unwrap();
        let generations = result.as_text().unwrap();
        assert_eq!(generations[0].likelihood, Some(-12.25));
        assert_eq!(generations[1].likelihood, None);
    }

    #[test]
    fn malformed_body_is_a_transport_error() {
        let err = CohereCommandCodec.decode_sync(b"not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn chunk_finality_follows_is_finished() {
        let first = CohereCommandCodec
            .decode_chunk(br#"{"text":"a","is_finished":false,"index":0}"#)
            .unwrap();
        assert_eq!(first, StreamEvent::new("a"));

        let last = CohereCommandCodec
            .decode_chunk(br#"{"is_finished":true,"finish_reason":"COMPLETE","index":0}"#)
            .unwrap();
        assert!(last.is_final);
        assert_eq!(last.text, "");
    }
}
