//! Error types for the task API client.
//!
//! # Design
//! Every failure collapses into one `ApiError` value that exposes a
//! human-readable `message()` and, for server failures, the decoded error
//! payload. `NotFound` gets a dedicated variant because callers frequently
//! distinguish "the task does not exist" from other server failures; it is
//! otherwise surfaced like any other status error.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by `TaskClient` parse methods and `TaskApi` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("{message}")]
    NotFound {
        message: String,
        payload: Option<Value>,
    },

    /// The server answered with a non-2xx status other than 404.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    /// The request was sent but no response arrived (timeout, refused
    /// connection, DNS failure).
    #[error("{0}")]
    Network(String),

    /// The request could not be built or sent at all.
    #[error("{0}")]
    Request(String),

    /// A 2xx response whose body is not the expected JSON.
    #[error("{0}")]
    Decode(String),
}

impl ApiError {
    /// Build the error for a non-2xx response, deriving the message from
    /// the server's JSON payload when it carries one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let payload = serde_json::from_str::<Value>(body).ok();
        let message = payload
            .as_ref()
            .and_then(payload_message)
            .unwrap_or_else(|| format!("request failed with status code {status}"));
        if status == 404 {
            ApiError::NotFound { message, payload }
        } else {
            ApiError::Server {
                status,
                message,
                payload,
            }
        }
    }

    /// Build the error for a 2xx body that failed to decode.
    pub fn decode(err: impl std::fmt::Display) -> Self {
        ApiError::Decode(format!("invalid response body: {err}"))
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound { message, .. } | ApiError::Server { message, .. } => message,
            ApiError::Network(message) | ApiError::Request(message) | ApiError::Decode(message) => {
                message
            }
        }
    }

    /// The server-supplied error payload, if the failure came with one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::NotFound { payload, .. } | ApiError::Server { payload, .. } => {
                payload.as_ref()
            }
            _ => None,
        }
    }

    /// HTTP status for failures that reached the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// First of `detail`, `error`, `message` that holds a non-empty string.
fn payload_message(payload: &Value) -> Option<String> {
    ["detail", "error", "message"]
        .iter()
        .filter_map(|key| payload.get(key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
