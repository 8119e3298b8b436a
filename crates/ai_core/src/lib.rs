//! AI Core - Foundation model adaptation layer
//!
//! Turns operator input into provider-specific Bedrock requests and provider
//! responses back into normalized results. Each provider family has a codec
//! (request encoder plus response decoder) and a parameter set; a single
//! generic adapter composes them with the transport.

pub mod adapter;
pub mod bedrock;
pub mod catalog;
pub mod config;
pub mod error;
pub mod parameters;
pub mod ports;
pub mod providers;
pub mod scripted;
pub mod streaming;

pub use adapter::{FoundationModelAdapter, Invocation, ModelAdapter, generated_image_name};
pub use bedrock::{BedrockModelCatalog, BedrockRuntimeTransport, FoundationModelSummary};
pub use catalog::{Catalog, CatalogEntry};
pub use config::BedrockConfig;
pub use error::{ErrorKind, InvocationError};
pub use parameters::{ParameterKind, ParameterSet, ParameterSpec, RawInputs};
pub use ports::{ChunkStream, EventStream, ImageSink, InputSource, Transport};
pub use providers::{ProviderCodec, StreamTermination};
pub use scripted::{MemoryImageSink, ScriptedInputSource};
pub use streaming::decode_stream;
