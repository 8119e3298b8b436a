//! Model selection - Identifies a provider/model family in the catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Output modality of a foundation model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Generated text
    Text,
    /// Generated images
    Image,
    /// Embedding vectors
    Embedding,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
            Self::Embedding => write!(f, "embedding"),
        }
    }
}

/// Stable key for every supported provider/model family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelSelection {
    /// Amazon Titan Text (Express / Lite)
    TitanText,
    /// Anthropic Claude (v2 / Instant)
    Claude,
    /// Meta Llama 2 chat
    Llama2,
    /// AI21 Jurassic-2
    Jurassic2,
    /// Cohere Command
    CohereCommand,
    /// Amazon Titan Image Generator
    TitanImage,
    /// Stability AI Stable Diffusion XL
    StableDiffusion,
    /// Amazon Titan text embeddings
    TitanEmbedding,
    /// Cohere Embed
    CohereEmbedding,
}

impl ModelSelection {
    /// Every selection, in menu order
    pub const ALL: [Self; 9] = [
        Self::TitanText,
        Self::Claude,
        Self::Llama2,
        Self::Jurassic2,
        Self::CohereCommand,
        Self::TitanImage,
        Self::StableDiffusion,
        Self::TitanEmbedding,
        Self::CohereEmbedding,
    ];

    /// Human readable name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::TitanText => "Amazon Titan Text",
            Self::Claude => "Anthropic Claude",
            Self::Llama2 => "Meta Llama 2",
            Self::Jurassic2 => "AI21 Jurassic-2",
            Self::CohereCommand => "Cohere Command",
            Self::TitanImage => "Amazon Titan Image",
            Self::StableDiffusion => "Stability Diffusion XL",
            Self::TitanEmbedding => "Amazon Titan Embedding",
            Self::CohereEmbedding => "Cohere Embedding",
        }
    }

    /// Key used on the command line and in configuration
    #[must_use]
    pub const fn config_key(&self) -> &'static str {
        match self {
            Self::TitanText => "titan-text",
            Self::Claude => "claude",
            Self::Llama2 => "llama2",
            Self::Jurassic2 => "jurassic2",
            Self::CohereCommand => "cohere-command",
            Self::TitanImage => "titan-image",
            Self::StableDiffusion => "sdxl",
            Self::TitanEmbedding => "titan-embed",
            Self::CohereEmbedding => "cohere-embed",
        }
    }

    #[must_use]
    pub const fn modality(&self) -> Modality {
        match self {
            Self::TitanText | Self::Claude | Self::Llama2 | Self::Jurassic2 | Self::CohereCommand => {
                Modality::Text
            },
            Self::TitanImage | Self::StableDiffusion => Modality::Image,
            Self::TitanEmbedding | Self::CohereEmbedding => Modality::Embedding,
        }
    }

    /// Parse from config string (case-insensitive)
    #[must_use]
    pub fn from_config(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|sel| sel.config_key() == key)
    }
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ModelSelection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_config(s).ok_or_else(|| DomainError::UnknownSelection(s.to_string()))
    }
}
