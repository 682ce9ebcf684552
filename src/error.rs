//! Error types for the PostgREST MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Each error variant provides actionable messages to help AI assistants understand
//! and recover from error conditions.

use thiserror::Error;

/// Maximum number of characters of an upstream error body kept in [`RestError::Http`].
pub const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Error, Debug)]
pub enum RestError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("PostgREST request failed with status {status}: {body}")]
    Http {
        status: u16,
        /// Response body text, truncated to 500 characters
        body: String,
    },

    #[error("Malformed response from PostgREST: {message}")]
    MalformedResponse { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RestError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an HTTP status error, truncating the body to [`MAX_ERROR_BODY_CHARS`].
    pub fn http(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }

    /// Create a malformed response error.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Configuration { .. } => Some(
                "Set SUPABASE_URL and SUPABASE_SERVICE_KEY (or SUPABASE_ANON_KEY) in the server environment",
            ),
            Self::Http { status: 401 | 403, .. } => {
                Some("Check that the API key has access to this table or function")
            }
            Self::Http { status: 404, .. } => {
                Some("Verify the table or function name exists and is exposed by PostgREST")
            }
            Self::Http { .. } => Some("Check the filter, order and select syntax"),
            Self::Network { .. } => Some("Check network connectivity and the SUPABASE_URL value"),
            _ => None,
        }
    }

    /// True for failures detected before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// HTTP status code of the upstream failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Classify reqwest client errors. Status errors are produced by the client itself,
/// so anything arriving here never reached a complete HTTP response.
impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RestError::network(format!("request timed out: {}", err))
        } else if err.is_connect() {
            RestError::network(format!("connection failed: {}", err))
        } else if err.is_decode() {
            RestError::malformed_response(err.to_string())
        } else {
            RestError::network(err.to_string())
        }
    }
}

/// Result type alias for PostgREST operations.
pub type RestResult<T> = Result<T, RestError>;
