//! Infrastructure adapters
//!
//! Adapters connect `ai_core` ports to concrete implementations.

mod file_image_sink;
mod stdin_input_source;

pub use file_image_sink::FileImageSink;
pub use stdin_input_source::StdinInputSource;
