//! Infrastructure layer - Adapters for the terminal and the filesystem
//!
//! Implements the input and image ports of `ai_core` and loads the
//! application configuration.

pub mod adapters;
pub mod config;

pub use adapters::*;
pub use config::{AppConfig, OutputConfig};
