//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Selection key does not name a known provider/model family
    #[error("Unknown model selection: {0}")]
    UnknownSelection(String),

    /// A request was built without a required option
    #[error("Missing option: {0}")]
    MissingOption(String),

    /// An option holds a value of the wrong type
    #[error("Option {option} expected {expected}, found {found}")]
    OptionTypeMismatch {
        option: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a type mismatch error
    pub fn type_mismatch(
        option: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::OptionTypeMismatch {
            option: option.into(),
            expected,
            found,
        }
    }
}
