//! Cohere Embed

use domain::{Embedding, GenerationRequest, InvocationResult, ModelSelection};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_QUESTION, ProviderCodec, extract, parse_document, to_payload};
use crate::error::InvocationError;
use crate::parameters::{ParameterSet, ParameterSpec};

static PARAMETERS: ParameterSet = ParameterSet {
    model_id: "cohere.embed-english-v3",
    prompt_label: "Question",
    prompt: DEFAULT_QUESTION,
    options: &[
        ParameterSpec::text("input_type", "classification"),
        ParameterSpec::text("truncate", "NONE"),
    ],
};

#[derive(Debug, Serialize)]
struct CohereEmbeddingRequest<'a> {
    texts: [&'a str; 1],
    input_type: &'a str,
    truncate: &'a str,
}

#[derive(Debug, Deserialize)]
struct CohereEmbeddingResponse {
    embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    response_type: Option<String>,
    #[serde(default)]
    texts: Vec<String>,
}

/// Codec for `cohere.embed-*`
#[derive(Debug, Default, Clone, Copy)]
pub struct CohereEmbeddingCodec;

impl ProviderCodec for CohereEmbeddingCodec {
    fn selection(&self) -> ModelSelection {
        ModelSelection::CohereEmbedding
    }

    fn parameters(&self) -> &'static ParameterSet {
        &PARAMETERS
    }

    fn encode(
        &self,
        request: &GenerationRequest,
        _streaming: bool,
    ) -> Result<Vec<u8>, InvocationError> {
        to_payload(&CohereEmbeddingRequest {
            texts: [request.prompt()],
            input_type: request.text("input_type")?,
            truncate: request.text("truncate")?,
        })
    }

    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError> {
        let response: CohereEmbeddingResponse = extract(parse_document(body)?)?;
        let values = response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| InvocationError::invalid_response("no embeddings returned"))?;

        Ok(InvocationResult::Embedding(Embedding {
            values,
            id: response.id,
            kind: response.response_type,
            input_token_count: None,
            texts: response.texts,
        }))
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
            default_payload(&CohereEmbeddingCodec, false),
            json!({
                "texts": ["Why do we dream?"],
                "input_type": "classification",
                "truncate": "NONE"
            })
        );
    }

    #[test]
    fn decodes_first_embedding_with_metadata() {
        let body = br#"{"embeddings":[[0.1,0.2],[0.3,0.4]],"id":"emb-1","response_type":"embeddings_floats","texts":["why"]}"#;
        let result = CohereEmbeddingCodec.decode_sync(body).unwrap();
        let embedding = result.as_embedding().unwrap();
        assert_eq!(embedding.values, [0.1, 0.2]);
        assert_eq!(embedding.id.as_deref(), Some("emb-1"));
        assert_eq!(embedding.kind.as_deref(), Some("embeddings_floats"));
        assert_eq!(embedding.texts, ["why"]);
    }

    #[test]
    fn empty_embeddings_is_a_transport_error() {
        let err = CohereEmbeddingCodec
            .decode_sync(br#"{"embeddings":[],"id":"x"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
