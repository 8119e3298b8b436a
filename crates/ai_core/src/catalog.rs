//! Catalog of model adapters
//!
//! Maps a selection key to an adapter wired with the shared transport and
//! image sink. Building an adapter is cheap and has no side effects.

use std::fmt;
use std::sync::Arc;

use domain::{Modality, ModelSelection};

use crate::adapter::{FoundationModelAdapter, ModelAdapter};
use crate::error::InvocationError;
use crate::ports::{ImageSink, Transport};
use crate::providers::{
    ClaudeCodec, CohereCommandCodec, CohereEmbeddingCodec, Jurassic2Codec, Llama2Codec,
    ProviderCodec, StableDiffusionCodec, TitanEmbeddingCodec, TitanImageCodec, TitanTextCodec,
};

/// Menu-facing description of one selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub selection: ModelSelection,
    pub modality: Modality,
    pub supports_streaming: bool,
}

/// Selection key to adapter dispatch
#[derive(Clone)]
pub struct Catalog {
    transport: Arc<dyn Transport>,
    images: Arc<dyn ImageSink>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

impl Catalog {
    pub fn new(transport: Arc<dyn Transport>, images: Arc<dyn ImageSink>) -> Self {
        Self { transport, images }
    }

    /// Adapter for a known selection
    #[must_use]
    pub fn get_adapter(&self, selection: ModelSelection) -> Box<dyn ModelAdapter> {
        match selection {
            ModelSelection::TitanText => self.wire(TitanTextCodec),
            ModelSelection::Claude => self.wire(ClaudeCodec),
            ModelSelection::Llama2 => self.wire(Llama2Codec),
            ModelSelection::Jurassic2 => self.wire(Jurassic2Codec),
            ModelSelection::CohereCommand => self.wire(CohereCommandCodec),
            ModelSelection::TitanImage => self.wire(TitanImageCodec),
            ModelSelection::StableDiffusion => self.wire(StableDiffusionCodec),
            ModelSelection::TitanEmbedding => self.wire(TitanEmbeddingCodec),
            ModelSelection::CohereEmbedding => self.wire(CohereEmbeddingCodec),
        }
    }

    /// Adapter for a selection key such as `titan-text` or `sdxl`
    pub fn get_adapter_by_key(&self, key: &str) -> Result<Box<dyn ModelAdapter>, InvocationError> {
        let selection: ModelSelection = key.parse()?;
        Ok(self.get_adapter(selection))
    }

    /// Every selection in menu order
    #[must_use]
    pub fn entries(&self) -> Vec<CatalogEntry> {
        ModelSelection::ALL
            .into_iter()
            .map(|selection| CatalogEntry {
                selection,
                modality: selection.modality(),
                supports_streaming: self.get_adapter(selection).supports_streaming(),
            })
            .collect()
    }

    fn wire<C: ProviderCodec>(&self, codec: C) -> Box<dyn ModelAdapter> {
        let adapter = FoundationModelAdapter::new(codec, Arc::clone(&self.transport));
        if adapter.selection().modality() == Modality::Image {
            Box::new(adapter.with_image_sink(Arc::clone(&self.images)))
        } else {
            Box::new(adapter)
        }
    }
}
