//! Custom error types for the common library
//!
//! Every call into the hosted backend returns a `BackendResult`, so callers
//! always get either the value or the reason the backend refused it.

use thiserror::Error;

/// Custom error type for backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    /// The request never got a response (DNS, TLS, connection reset, ...)
    #[error("Backend network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The addressed row or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Email/password pair refused by the auth endpoint
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Object storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// The backend answered with a body we could not decode
    #[error("Unexpected backend response: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Backend configuration error: {0}")]
    Configuration(String),
}

impl BackendError {
    /// True when the failure happened before the backend could answer
    pub fn is_network(&self) -> bool {
        matches!(self, BackendError::Network(_))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

/// Type alias for Result with BackendError
pub type BackendResult<T> = Result<T, BackendError>;
