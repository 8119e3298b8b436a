//! Domain layer for Bedrock Console
//!
//! Contains the data model of a model invocation: requests, results, stream
//! events and the catalog selection keys. No I/O happens here.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
