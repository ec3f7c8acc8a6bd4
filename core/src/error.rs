//! Error types for the todo API client.
//!
//! # Design
//! `ApiError` keeps the detail a developer needs (status, body, transport
//! message) while its `Display` text is the human-readable message the UI
//! shows in its error banner. `ErrorKind` collapses the variants into the
//! five categories screens branch on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure category a screen can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The resource id is unknown to the server.
    NotFound,
    /// The server answered with a 5xx status.
    ServerError,
    /// No connectivity, DNS failure or timeout.
    NetworkError,
    /// Rejected client-side before any network call.
    ValidationError,
    Unknown,
}

/// Errors returned by the client, the transport and the store.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404, the requested todo does not exist.
    #[error("Todo not found")]
    NotFound,

    /// The server returned a 5xx status.
    #[error("Server error. Please try again later.")]
    ServerError { status: u16, body: String },

    /// The request never got an answer: connect, DNS or I/O failure.
    #[error("Network error. Check your connection.")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out. Check your connection.")]
    Timeout,

    /// Input rejected before it reached the network.
    #[error("{0}")]
    Validation(String),

    /// The server returned a non-2xx status that is neither 404 nor 5xx.
    #[error("Something went wrong. Please try again.")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("Unexpected response from the server.")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("Could not prepare the request.")]
    SerializationError(String),

    /// The transport refused to build the request (bad URL, bad header).
    #[error("Could not prepare the request.")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound => ErrorKind::NotFound,
            ApiError::ServerError { .. } => ErrorKind::ServerError,
            ApiError::Network(_) | ApiError::Timeout => ErrorKind::NetworkError,
            ApiError::Validation(_) => ErrorKind::ValidationError,
            ApiError::HttpError { .. }
            | ApiError::DeserializationError(_)
            | ApiError::SerializationError(_)
            | ApiError::InvalidRequest(_) => ErrorKind::Unknown,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::ServerError { status, .. } | ApiError::HttpError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_and_network_share_a_kind_but_not_a_variant() {
        assert_eq!(ApiError::Timeout.kind(), ErrorKind::NetworkError);
        assert_eq!(
            ApiError::Network("dns".to_string()).kind(),
            ErrorKind::NetworkError
        );
        assert!(!matches!(ApiError::Timeout, ApiError::Network(_)));
    }

    #[test]
    fn display_is_the_banner_message() {
        assert_eq!(ApiError::NotFound.to_string(), "Todo not found");
        let err = ApiError::ServerError {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.to_string(), "Server error. Please try again later.");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn unexpected_statuses_are_unknown() {
        let err = ApiError::HttpError {
            status: 409,
            body: String::new(),
        };
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(
            ApiError::DeserializationError("eof".to_string()).kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn unexpected_failures_keep_details_out_of_the_banner() {
        let err = ApiError::HttpError {
            status: 400,
            body: r#"{"error":"title is required"}"#.to_string(),
        };
        assert_eq!(err.to_string(), "Something went wrong. Please try again.");
        assert_eq!(err.status(), Some(400));
        assert!(format!("{err:?}").contains("title is required"));

        let err = ApiError::DeserializationError("expected value at line 1".to_string());
        assert_eq!(err.to_string(), "Unexpected response from the server.");
        assert!(!err.to_string().contains("line 1"));
        assert_eq!(
            ApiError::InvalidRequest("relative URL".to_string()).to_string(),
            "Could not prepare the request."
        );
    }
}
