//! Client error types.
//!
//! The taxonomy is deliberately coarse: the transport failed, the server said
//! no, the body didn't parse, or a client-side guard refused to send the
//! request at all. Service functions return these untouched; state stores turn
//! them into user-facing messages.

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum number of body characters kept in a status error message.
const MAX_MESSAGE_CHARS: usize = 300;

/// Errors returned by [`ApiClient`](crate::ApiClient) and the resource
/// services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout, or TLS error.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Backend `detail` message, or the raw body text.
        message: String,
    },

    /// Response body was not the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A client-side guard rejected the input before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Shorthand for a [`ApiError::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a status error from a response body.
    ///
    /// FastAPI puts human-readable errors in `detail`, either as a string or
    /// as a list of validation entries with a `msg` field. Anything else is
    /// kept as truncated raw text.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| detail_message(&value))
            .unwrap_or_else(|| body.chars().take(MAX_MESSAGE_CHARS).collect());

        Self::Status { status, message }
    }

    /// HTTP status, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// 401: the session token is missing, expired, or rejected.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// 403: authenticated, but the role may not do this.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }

    /// 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Whether the request timed out in the transport.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

fn detail_message(value: &serde_json::Value) -> Option<String> {
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(entries) => {
            let msgs: Vec<&str> = entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}
