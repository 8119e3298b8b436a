//! Provider codecs
//!
//! One module per provider/model family. Each codec owns the family's
//! parameter set, builds the exact request body the provider expects, and
//! turns response bodies (or single stream chunks) into normalized results.

mod ai21_jurassic;
mod amazon_titan_embedding;
mod amazon_titan_image;
mod amazon_titan_text;
mod anthropic_claude;
mod cohere_command;
mod cohere_embedding;
mod meta_llama2;
mod stability_diffusion;

pub use ai21_jurassic::Jurassic2Codec;
pub use amazon_titan_embedding::TitanEmbeddingCodec;
pub use amazon_titan_image::TitanImageCodec;
pub use amazon_titan_text::TitanTextCodec;
pub use anthropic_claude::ClaudeCodec;
pub use cohere_command::CohereCommandCodec;
pub use cohere_embedding::CohereEmbeddingCodec;
pub use meta_llama2::Llama2Codec;
pub use stability_diffusion::StableDiffusionCodec;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use domain::{GenerationRequest, InvocationResult, ModelSelection, StreamEvent};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvocationError;
use crate::parameters::ParameterSet;

/// Default prompt for text and embedding models
pub(crate) const DEFAULT_QUESTION: &str = "Why do we dream?";

/// Default prompt for image models
pub(crate) const DEFAULT_IMAGE_PROMPT: &str = "A boy is playing with dog in the park.";

/// How a provider's event stream ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamTermination {
    /// The last chunk carries an explicit final marker; closing earlier is an error
    FinalMarker,
    /// The stream simply ends when the transport closes it
    TransportClose,
}

/// Request encoder and response decoder for one provider/model family
pub trait ProviderCodec: Send + Sync + 'static {
    /// Catalog key this codec serves
    fn selection(&self) -> ModelSelection;

    /// Recognized options and their defaults
    fn parameters(&self) -> &'static ParameterSet;

    /// Build the provider request body
    ///
    /// `streaming` is passed for providers whose body carries a stream flag.
    fn encode(
        &self,
        request: &GenerationRequest,
        streaming: bool,
    ) -> Result<Vec<u8>, InvocationError>;

    /// Decode one complete response body
    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError>;

    /// Stream support; `None` when the provider cannot stream
    fn stream_termination(&self) -> Option<StreamTermination> {
        None
    }

    /// Decode one stream chunk, independently of every other chunk
    fn decode_chunk(&self, _chunk: &[u8]) -> Result<StreamEvent, InvocationError> {
        Err(InvocationError::Capability(format!(
            "{} does not support streaming",
            self.selection()
        )))
    }
}

/// Token counts Bedrock appends to the last chunk of a stream
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InvocationMetrics {
    #[serde(default)]
    pub input_token_count: Option<u32>,
    #[serde(default)]
    pub output_token_count: Option<u32>,
}

/// Serialize a request body
pub(crate) fn to_payload<T: Serialize>(body: &T) -> Result<Vec<u8>, InvocationError> {
    serde_json::to_vec(body)
        .map_err(|e| InvocationError::Transport(format!("Failed to encode request: {e}")))
}

/// Parse a complete response body into a JSON document
pub(crate) fn parse_document(body: &[u8]) -> Result<Value, InvocationError> {
    serde_json::from_slice(body).map_err(InvocationError::invalid_response)
}

/// Fail with a model error when the document carries a non-null `error` field
pub(crate) fn check_error_field(document: &Value, context: &str) -> Result<(), InvocationError> {
    match document.get("error") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(message)) => Err(InvocationError::Model(format!("{context}: {message}"))),
        Some(other) => Err(InvocationError::Model(format!("{context}: {other}"))),
    }
}

/// Extract the typed response shape from an already checked document
pub(crate) fn extract<T: DeserializeOwned>(document: Value) -> Result<T, InvocationError> {
    serde_json::from_value(document).map_err(InvocationError::invalid_response)
}

/// Parse one stream chunk
pub(crate) fn parse_chunk<T: DeserializeOwned>(chunk: &[u8]) -> Result<T, InvocationError> {
    serde_json::from_slice(chunk).map_err(InvocationError::invalid_response)
}

/// Decode a base64 image payload
pub(crate) fn decode_base64(encoded: &str) -> Result<Vec<u8>, InvocationError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| InvocationError::invalid_response(format!("bad base64 image: {e}")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::Value;

    use super::ProviderCodec;
    use crate::parameters::RawInputs;

    /// Encode the all-defaults request of a codec and parse it back
    pub fn default_payload(codec: &dyn ProviderCodec, streaming: bool) -> Value {
        let request = codec.parameters().resolve(&RawInputs::new()).unwrap();
        let bytes = codec.encode(&request, streaming).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
