//! Error normalization for API calls.
//!
//! Every failure a call can produce collapses into [`ApiError`], whose
//! `Display` output is the human-readable message screens surface.
//! Reducers and screens never inspect transport details.

use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Fallback message when the server gives us nothing usable.
pub const GENERIC_FAILURE: &str = "An error occurred";

/// Normalized error taxonomy for API calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid or expired session (HTTP 401). The stored credential has
    /// already been cleared by the time callers see this.
    #[error("{message}")]
    Unauthorized {
        /// Server-provided message, or `"Unauthorized"`.
        message: String,
    },

    /// Field validation failure (HTTP 422), flattened to one display
    /// string.
    #[error("{message}")]
    Validation {
        /// Combined field messages, newline-separated.
        message: String,
    },

    /// Any other HTTP error with a usable message.
    #[error("{message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server message or status text.
        message: String,
    },

    /// The request never produced a response (DNS, connect, TLS).
    #[error("{0}")]
    Network(String),

    /// The server did not respond within the request timeout.
    #[error("Request timed out")]
    Timeout,

    /// The response body did not match the expected shape.
    #[error("Unexpected response from server")]
    Decode(String),

    /// Secure credential storage failed.
    #[error("Secure storage failed: {0}")]
    Storage(String),
}

/// Laravel error body: either a single `message` or an `errors` map of
/// field name to messages.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    /// Normalize a non-success HTTP response into an [`ApiError`].
    ///
    /// - 422 → [`ApiError::Validation`]: the body's `message`, or its
    ///   `errors` map flattened into one newline-joined string
    /// - 401 → [`ApiError::Unauthorized`] (credential clearing is the
    ///   client's job, not this function's)
    /// - anything else → [`ApiError::Server`] with the body `message`
    ///   when present, else the status' canonical reason
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();

        match status {
            StatusCode::UNPROCESSABLE_ENTITY => {
                let message = parsed
                    .and_then(|body| body.message.or_else(|| body.errors.map(flatten_errors)))
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string());
                Self::Validation { message }
            },
            StatusCode::UNAUTHORIZED => {
                let message = parsed
                    .and_then(|body| body.message)
                    .unwrap_or_else(|| "Unauthorized".to_string());
                Self::Unauthorized { message }
            },
            status => {
                let message = parsed.and_then(|body| body.message).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or(GENERIC_FAILURE)
                        .to_string()
                });
                Self::Server {
                    status: status.as_u16(),
                    message,
                }
            },
        }
    }

    /// `true` when this error means the session is gone and the user must
    /// authenticate again.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The user-facing message for this error.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Flatten a Laravel `errors` map into one newline-joined string.
fn flatten_errors(errors: BTreeMap<String, Vec<String>>) -> String {
    errors
        .into_values()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}
