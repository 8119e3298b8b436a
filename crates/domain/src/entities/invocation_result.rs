//! Invocation result entity

use serde::{Deserialize, Serialize};

use crate::value_objects::Modality;

/// One generated completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGeneration {
    /// Generated text
    pub text: String,
    /// Number of generated tokens, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
    /// Why generation stopped, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Prompt token count of the response that produced this generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_token_count: Option<u32>,
    /// Log-likelihood, when requested from the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<f64>,
}

impl TextGeneration {
    /// Create a generation with only text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            token_count: None,
            finish_reason: None,
            input_token_count: None,
            likelihood: None,
        }
    }

    #[must_use]
    pub const fn with_token_count(mut self, count: u32) -> Self {
        self.token_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub const fn with_input_token_count(mut self, count: u32) -> Self {
        self.input_token_count = Some(count);
        self
    }

    #[must_use]
    pub const fn with_likelihood(mut self, likelihood: f64) -> Self {
        self.likelihood = Some(likelihood);
        self
    }
}

/// An embedding vector plus optional provider metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub values: Vec<f32>,
    /// Provider response id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Provider response type (e.g. `embeddings_floats`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Prompt token count, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_token_count: Option<u32>,
    /// Input texts echoed back by the provider
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texts: Vec<String>,
}

impl Embedding {
    #[must_use]
    pub const fn new(values: Vec<f32>) -> Self {
        Self {
            values,
            id: None,
            kind: None,
            input_token_count: None,
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_input_token_count(mut self, count: u32) -> Self {
        self.input_token_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_texts(mut self, texts: Vec<String>) -> Self {
        self.texts = texts;
        self
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.values.len()
    }
}

/// Normalized outcome of a single-shot invocation
///
/// Exactly one variant is produced per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InvocationResult {
    /// Completions in provider order
    Text(Vec<TextGeneration>),
    /// Decoded image bytes in provider order
    Image(Vec<Vec<u8>>),
    /// A single embedding vector
    Embedding(Embedding),
}

impl InvocationResult {
    #[must_use]
    pub const fn modality(&self) -> Modality {
        match self {
            Self::Text(_) => Modality::Text,
            Self::Image(_) => Modality::Image,
            Self::Embedding(_) => Modality::Embedding,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&[TextGeneration]> {
        match self {
            Self::Text(generations) => Some(generations),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_images(&self) -> Option<&[Vec<u8>]> {
        match self {
            Self::Image(images) => Some(images),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_embedding(&self) -> Option<&Embedding> {
        match self {
            Self::Embedding(embedding) => Some(embedding),
            _ => None,
        }
    }
}
