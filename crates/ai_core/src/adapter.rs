//! Model adapters
//!
//! A [`ModelAdapter`] runs one invocation end to end: collect input, resolve
//! the request, encode it, call the transport and decode the answer. Every
//! provider is served by the same [`FoundationModelAdapter`] composed with
//! that provider's codec.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{InvocationResult, ModelSelection};
use tracing::{debug, info, instrument};

use crate::error::InvocationError;
use crate::parameters::ParameterSet;
use crate::ports::{EventStream, ImageSink, InputSource, Transport};
use crate::providers::ProviderCodec;
use crate::streaming::decode_stream;

/// Outcome of [`ModelAdapter::process`]
pub enum Invocation {
    /// Fully decoded single-shot result
    Complete(InvocationResult),
    /// Lazily decoded event sequence
    Streaming(EventStream),
}

impl Invocation {
    /// The single-shot result, if this was not a streaming invocation
    #[must_use]
    pub fn into_result(self) -> Option<InvocationResult> {
        match self {
            Self::Complete(result) => Some(result),
            Self::Streaming(_) => None,
        }
    }

    /// The event stream, if this was a streaming invocation
    #[must_use]
    pub fn into_stream(self) -> Option<EventStream> {
        match self {
            Self::Complete(_) => None,
            Self::Streaming(stream) => Some(stream),
        }
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete(result) => f.debug_tuple("Complete").field(result).finish(),
            Self::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

/// File name under which the image at 0-based `index` is written
pub fn generated_image_name(index: usize) -> String {
    format!("generated_image-{}.png", index + 1)
}

/// One provider/model family behind a uniform contract
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    fn selection(&self) -> ModelSelection;

    fn parameters(&self) -> &'static ParameterSet;

    /// Whether `process` accepts `streaming = true`
    fn supports_streaming(&self) -> bool;

    /// Collect input, invoke the model once and decode the answer
    ///
    /// Streaming on an adapter without streaming support fails before any
    /// input is read or the transport is called.
    async fn process(
        &self,
        input: &mut dyn InputSource,
        streaming: bool,
    ) -> Result<Invocation, InvocationError>;
}

/// Adapter built from a provider codec and the shared collaborators
pub struct FoundationModelAdapter<C> {
    codec: Arc<C>,
    transport: Arc<dyn Transport>,
    images: Option<Arc<dyn ImageSink>>,
}

impl<C: fmt::Debug> fmt::Debug for FoundationModelAdapter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoundationModelAdapter")
            .field("codec", &self.codec)
            .field("image_sink", &self.images.is_some())
            .finish_non_exhaustive()
    }
}

impl<C: ProviderCodec> FoundationModelAdapter<C> {
    pub fn new(codec: C, transport: Arc<dyn Transport>) -> Self {
        Self {
            codec: Arc::new(codec),
            transport,
            images: None,
        }
    }

    /// Where decoded images are written
    #[must_use]
    pub fn with_image_sink(mut self, sink: Arc<dyn ImageSink>) -> Self {
        self.images = Some(sink);
        self
    }

    fn persist_images(&self, result: &InvocationResult) -> Result<(), InvocationError> {
        let (Some(sink), Some(images)) = (&self.images, result.as_images()) else {
            return Ok(());
        };

        for (index, image) in images.iter().enumerate() {
            let name = generated_image_name(index);
            sink.write(image, &name)?;
            info!(file = %name, bytes = image.len(), "Image written");
        }

        Ok(())
    }
}

#[async_trait]
impl<C: ProviderCodec> ModelAdapter for FoundationModelAdapter<C> {
    fn selection(&self) -> ModelSelection {
        self.codec.selection()
    }

    fn parameters(&self) -> &'static ParameterSet {
        self.codec.parameters()
    }

    fn supports_streaming(&self) -> bool {
        self.codec.stream_termination().is_some()
    }

    #[instrument(skip(self, input), fields(selection = %self.codec.selection()))]
    async fn process(
        &self,
        input: &mut dyn InputSource,
        streaming: bool,
    ) -> Result<Invocation, InvocationError> {
        let termination = match (streaming, self.codec.stream_termination()) {
            (false, _) => None,
            (true, Some(termination)) => Some(termination),
            (true, None) => {
                return Err(InvocationError::Capability(format!(
                    "{} does not support streaming",
                    self.codec.selection()
                )));
            },
        };

        let parameters = self.codec.parameters();
        let raw = parameters.collect(input)?;
        let request = parameters.resolve(&raw)?;
        let payload = self.codec.encode(&request, streaming)?;

        debug!(
            model = %request.model_id(),
            bytes = payload.len(),
            streaming,
            "Invoking model"
        );

        if let Some(termination) = termination {
            let chunks = self
                .transport
                .invoke_streaming(request.model_id(), payload)
                .await?;
            return Ok(Invocation::Streaming(decode_stream(
                chunks,
                Arc::clone(&self.codec),
                termination,
            )));
        }

        let body = self.transport.invoke(request.model_id(), payload).await?;
        debug!(bytes = body.len(), "Response received");

        let result = self.codec.decode_sync(&body)?;
        self.persist_images(&result)?;

        Ok(Invocation::Complete(result))
    }
}
