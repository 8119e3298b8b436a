//! Invocation errors

use domain::DomainError;
use thiserror::Error;

/// Coarse classification of an [`InvocationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad operator-supplied parameter
    Validation,
    /// The call itself failed, or the response could not be read
    Transport,
    /// The call succeeded but the provider reported a failure in the payload
    Model,
    /// The adapter does not support the requested mode
    Capability,
    /// The selection key is not in the catalog
    UnknownSelection,
    /// Decoded output could not be persisted
    Sink,
    /// Operator input could not be read
    Input,
}

/// Errors that can occur while invoking a foundation model
#[derive(Debug, Error)]
pub enum InvocationError {
    /// A supplied parameter could not be parsed into its declared type
    #[error("Invalid value {value:?} for {option}: {reason}")]
    Validation {
        option: String,
        value: String,
        reason: String,
    },

    /// Connection, authentication or service failure, or an unreadable response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider-reported failure inside a successful response
    #[error("{0}")]
    Model(String),

    /// Requested mode is not supported by the chosen adapter
    #[error("Capability not supported: {0}")]
    Capability(String),

    /// Selection key is not known to the catalog
    #[error("Unknown model selection: {0}")]
    UnknownSelection(String),

    /// Writing generated output failed
    #[error("Failed to write output: {0}")]
    Sink(String),

    /// Reading operator input failed
    #[error("Failed to read input: {0}")]
    Input(String),
}

impl InvocationError {
    /// Create a validation error
    pub fn validation(
        option: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            option: option.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// A response body that could not be parsed
    pub fn invalid_response(detail: impl std::fmt::Display) -> Self {
        Self::Transport(format!("Invalid response: {detail}"))
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Model(_) => ErrorKind::Model,
            Self::Capability(_) => ErrorKind::Capability,
            Self::UnknownSelection(_) => ErrorKind::UnknownSelection,
            Self::Sink(_) => ErrorKind::Sink,
            Self::Input(_) => ErrorKind::Input,
        }
    }

    /// Only validation failures can be fixed by asking the operator again
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<DomainError> for InvocationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnknownSelection(key) => Self::UnknownSelection(key),
            DomainError::OptionTypeMismatch {
                option,
                expected,
                found,
            } => Self::validation(option, found, format!("expected {expected}")),
            DomainError::MissingOption(option) => {
                Self::validation(option, "", "option was not resolved")
            },
            DomainError::ValidationError(reason) => Self::validation("request", "", reason),
        }
    }
}

impl From<reqwest::Error> for InvocationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("Request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("Connection failed: {err}"))
        } else {
            Self::Transport(format!("Request failed: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(
            InvocationError::validation("temperature", "abc", "not a number").kind(),
            ErrorKind::Validation
        );
        assert_eq!(InvocationError::Transport("x".into()).kind(), ErrorKind::Transport);
        assert_eq!(InvocationError::Model("x".into()).kind(), ErrorKind::Model);
        assert_eq!(InvocationError::Capability("x".into()).kind(), ErrorKind::Capability);
        assert_eq!(
            InvocationError::UnknownSelection("x".into()).kind(),
            ErrorKind::UnknownSelection
        );
        assert_eq!(InvocationError::Sink("x".into()).kind(), ErrorKind::Sink);
        assert_eq!(InvocationError::Input("x".into()).kind(), ErrorKind::Input);
    }

    #[test]
    fn only_validation_is_recoverable() {
        assert!(InvocationError::validation("topP", "x", "bad").is_recoverable());
        assert!(!InvocationError::Transport("down".into()).is_recoverable());
        assert!(!InvocationError::Model("filtered".into()).is_recoverable());
    }

    #[test]
    fn validation_message_names_option_and_value() {
        let err = InvocationError::validation("temperature", "abc", "expected a number");
        assert_eq!(
            err.to_string(),
            r#"Invalid value "abc" for temperature: expected a number"#
        );
    }

    #[test]
    fn model_error_shows_provider_message() {
        let err = InvocationError::Model("Text Generation Error: filtered".into());
        assert_eq!(err.to_string(), "Text Generation Error: filtered");
    }

    #[test]
    fn invalid_response_is_a_transport_error() {
        let err = InvocationError::invalid_response("EOF while parsing");
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("EOF while parsing"));
    }

    #[test]
    fn domain_errors_convert() {
        let err: InvocationError = DomainError::UnknownSelection("gpt".into()).into();
        assert_eq!(err.kind(), ErrorKind::UnknownSelection);

        let err: InvocationError = DomainError::type_mismatch("seed", "int", "float").into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("seed"));
    }
}
