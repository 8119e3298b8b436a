//! Amazon Titan text embeddings

use domain::{Embedding, GenerationRequest, InvocationResult, ModelSelection};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_QUESTION, ProviderCodec, extract, parse_document, to_payload};
use crate::error::InvocationError;
use crate::parameters::ParameterSet;

static PARAMETERS: ParameterSet = ParameterSet {
    model_id: "amazon.titan-embed-g1-text-02",
    prompt_label: "Question",
    prompt: DEFAULT_QUESTION,
    options: &[],
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanEmbeddingRequest<'a> {
    input_text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanEmbeddingResponse {
    embedding: Vec<f32>,
    #[serde(default)]
    input_text_token_count: Option<u32>,
}

/// Codec for `amazon.titan-embed-*`
#[derive(Debug, Default, Clone, Copy)]
pub struct TitanEmbeddingCodec;

impl ProviderCodec for TitanEmbeddingCodec {
    fn selection(&self) -> ModelSelection {
        ModelSelection::TitanEmbedding
    }

    fn parameters(&self) -> &'static ParameterSet {
        &PARAMETERS
    }

    fn encode(
        &self,
        request: &GenerationRequest,
        _streaming: bool,
    ) -> Result<Vec<u8>, InvocationError> {
        to_payload(&TitanEmbeddingRequest {
            input_text: request.prompt(),
        })
    }

    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError> {
        let response: TitanEmbeddingResponse = extract(parse_document(body)?)?;
        let mut embedding = Embedding::new(response.embedding);
        embedding.input_token_count = response.input_text_token_count;
        Ok(InvocationResult::Embedding(embedding))
    }
}
