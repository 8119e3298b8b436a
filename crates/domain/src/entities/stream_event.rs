//! Stream event entity

use serde::{Deserialize, Serialize};

/// One incremental unit of a streaming response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Text fragment carried by this chunk
    pub text: String,
    /// Whether the provider marked this chunk as the last one
    #[serde(default)]
    pub is_final: bool,
    /// Cumulative prompt token count, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    /// Cumulative generated token count, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
}

impl StreamEvent {
    /// Create a non-final event carrying a fragment
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
            input_tokens: None,
            output_tokens: None,
        }
    }

    #[must_use]
    pub const fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    #[must_use]
    pub const fn with_token_counts(mut self, input: Option<u32>, output: Option<u32>) -> Self {
        self.input_tokens = input;
        self.output_tokens = output;
        self
    }
}
