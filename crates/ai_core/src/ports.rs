//! Port definitions for model invocation
//!
//! Defines the traits (ports) the adaptation layer talks to: where operator
//! input comes from, how payloads reach the inference service, and where
//! decoded images go.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use domain::StreamEvent;
use futures::Stream;
#[cfg(test)]
use mockall::automock;

use crate::error::InvocationError;

/// Raw response chunks as delivered by a streaming transport
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, InvocationError>> + Send>>;

/// Decoded stream events, in emission order
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, InvocationError>> + Send>>;

/// Port for the remote inference service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one payload and return the complete response body
    async fn invoke(&self, model_id: &str, payload: Vec<u8>) -> Result<Bytes, InvocationError>;

    /// Send one payload and return the response as a lazy chunk sequence
    async fn invoke_streaming(
        &self,
        model_id: &str,
        payload: Vec<u8>,
    ) -> Result<ChunkStream, InvocationError>;
}

/// Port for operator input
///
/// Implementations return the raw answer; an empty string means "use the
/// default". The default is passed along so that it can be shown.
pub trait InputSource: Send {
    fn get(&mut self, label: &str, default: &str) -> Result<String, InvocationError>;
}

/// Port for persisting decoded images
#[cfg_attr(test, automock)]
pub trait ImageSink: Send + Sync {
    fn write(&self, bytes: &[u8], suggested_name: &str) -> Result<(), InvocationError>;
}
