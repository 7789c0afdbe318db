//! # API Errors
//!
//! Error types for API operations.

use thiserror::Error;

use crate::role::Role;

/// Errors that can occur during API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("server error: {status} - {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from the backend.
        message: String,
    },

    /// Failed to deserialize response.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// The response carried no profile where the role's endpoint puts it.
    #[error("response has no profile at `{path}`")]
    MissingProfile {
        /// Dotted path that was expected, e.g. `data.coach`.
        path: String,
    },

    /// The role has no login endpoint.
    #[error("{0} accounts cannot sign in directly")]
    NoLoginEndpoint(Role),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
