//! Amazon Bedrock HTTP clients
//!
//! Runtime invocations (single-shot and event-stream) and the control plane
//! model listing.

mod client;
mod errors;
mod event_stream;
mod models;

pub use client::BedrockRuntimeTransport;
pub use errors::http_error;
pub use event_stream::{EventStreamDecoder, Frame, chunk_bytes, create_stream};
pub use models::{BedrockModelCatalog, FoundationModelSummary};
