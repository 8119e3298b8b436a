//! Bedrock HTTP error classification
//!
//! Failed calls usually carry `{"message": "...", "__type": "..."}`. The
//! message is kept verbatim; the status decides the category prefix.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::InvocationError;

fn extract_message(json: &Value) -> Option<String> {
    json.get("message")
        .or_else(|| json.get("Message"))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_error_type(json: &Value) -> Option<String> {
    json.get("__type")
        .and_then(Value::as_str)
        .map(|s| s.rsplit('#').next().unwrap_or(s).trim().to_string())
        .filter(|s| !s.is_empty())
}

fn category(status: StatusCode, error_type: &str) -> &'static str {
    if status == StatusCode::TOO_MANY_REQUESTS || error_type.to_lowercase().contains("throttl") {
        return "Throttled";
    }
    match status.as_u16() {
        401 | 403 => "Access denied",
        404 => "Model not found",
        400 | 413 | 415 | 422 => "Invalid request",
        408 => "Model timeout",
        _ if status.is_server_error() => "Service error",
        _ => "Request failed",
    }
}

/// Build the transport error for a non-success response
pub fn http_error(status: StatusCode, body: &str) -> InvocationError {
    let json = serde_json::from_str::<Value>(body).ok();
    let message = json
        .as_ref()
        .and_then(extract_message)
        .unwrap_or_else(|| body.trim().to_string());
    let error_type = json.as_ref().and_then(extract_error_type);

    let category = category(status, error_type.as_deref().unwrap_or_default());
    let detail = match error_type {
        Some(kind) => format!("{kind}: {message}"),
        None => message,
    };

    InvocationError::Transport(format!(
        "{category} (status {}): {detail}",
        status.as_u16()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn access_denied_keeps_message_and_type() {
        let err = http_error(
            StatusCode::FORBIDDEN,
            r#"{"message":"You don't have access to the model with the specified model ID.","__type":"AccessDeniedException"}"#,
        );
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.to_string(),
            "Transport error: Access denied (status 403): AccessDeniedException: You don't have access to the model with the specified model ID."
        );
    }

    #[test]
    fn throttling_is_detected_from_type() {
        let err = http_error(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Too many tokens","__type":"com.amazon.bedrock#ThrottlingException"}"#,
        );
        assert!(err.to_string().contains("Throttled (status 400): ThrottlingException"));
    }

    #[test]
    fn validation_errors_are_invalid_requests() {
        let err = http_error(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Malformed input request: temperature must be <= 1"}"#,
        );
        assert_eq!(
            err.to_string(),
            "Transport error: Invalid request (status 400): Malformed input request: temperature must be <= 1"
        );
    }

    #[test]
    fn non_json_body_is_used_verbatim() {
        let err = http_error(StatusCode::BAD_GATEWAY, "upstream unavailable\n");
        assert_eq!(
            err.to_string(),
            "Transport error: Service error (status 502): upstream unavailable"
        );
    }
}
