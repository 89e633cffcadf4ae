//! Error types for the products API client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when the server gave nothing a person could act on.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// One field rejected by validation, client- or server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    /// Human-readable reason; `error` on the wire
    #[serde(rename = "error")]
    pub message: String,
}

/// Errors that can occur when talking to the products API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The addressed product does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The server rejected the payload.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    /// Path id and payload id disagreed.
    #[error("id mismatch: {message}")]
    IdMismatch { message: String },

    /// Any other non-success status.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// A success response carried an unexpected body.
    #[error("parse error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> &str {
        match self {
            ClientError::NotFound { message }
            | ClientError::Validation { message, .. }
            | ClientError::IdMismatch { message } => message,
            ClientError::Server {
                message: Some(message),
                ..
            } => message,
            ClientError::Server { message: None, .. }
            | ClientError::Transport(_)
            | ClientError::Decode(_) => FALLBACK_MESSAGE,
        }
    }

    /// Build the error for a non-success response from its status and body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();

        let Some(ErrorEnvelope { error }) = envelope else {
            return ClientError::Server {
                status,
                message: None,
            };
        };

        match (status, error.code.as_str()) {
            (404, _) => ClientError::NotFound {
                message: error.message,
            },
            (400, "validation_error") => ClientError::Validation {
                message: error.message,
                fields: error
                    .details
                    .into_iter()
                    .filter_map(|detail| serde_json::from_value(detail).ok())
                    .collect(),
            },
            (400, "id_mismatch") => ClientError::IdMismatch {
                message: error.message,
            },
            _ => ClientError::Server {
                status,
                message: Some(error.message).filter(|message| !message.is_empty()),
            },
        }
    }
}

/// Error envelope returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(code: &str, message: &str, details: serde_json::Value) -> String {
        serde_json::json!({
            "error": {
                "code": code,
                "message": message,
                "details": details,
                "trace_id": "0",
                "timestamp": "now"
            }
        })
        .to_string()
    }

    #[test]
    fn not_found_keeps_server_message() {
        let err = ClientError::from_response(
            404,
            &envelope("not_found", "Product not found", serde_json::json!([])),
        );
        assert!(matches!(err, ClientError::NotFound { .. }));
        assert_eq!(err.user_message(), "Product not found");
    }

    #[test]
    fn validation_details_become_field_errors() {
        let err = ClientError::from_response(
            400,
            &envelope(
                "validation_error",
                "One or more fields are invalid",
                serde_json::json!([{ "field": "price", "error": "Price must be greater than 0" }]),
            ),
        );

        let ClientError::Validation { fields, .. } = &err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(fields[0].field, "price");
        assert_eq!(fields[0].message, "Price must be greater than 0");
    }

    #[test]
    fn id_mismatch_is_recognised() {
        let err = ClientError::from_response(
            400,
            &envelope("id_mismatch", "Product ID mismatch", serde_json::json!([])),
        );
        assert!(matches!(err, ClientError::IdMismatch { .. }));
    }

    #[test]
    fn unstructured_body_falls_back_to_generic_message() {
        let err = ClientError::from_response(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, ClientError::Server { status: 502, .. }));
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);

        let err = ClientError::Decode("eof".to_string());
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn display_includes_status() {
        let err = ClientError::Server {
            status: 500,
            message: Some("boom".to_string()),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }
}
