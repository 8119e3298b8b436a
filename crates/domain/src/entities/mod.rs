//! Domain entities - Requests and results of a model invocation

mod generation_request;
mod invocation_result;
mod stream_event;

pub use generation_request::GenerationRequest;
pub use invocation_result::{Embedding, InvocationResult, TextGeneration};
pub use stream_event::StreamEvent;
