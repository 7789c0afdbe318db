//! # API Types
//!
//! Types for API requests and responses.

use serde::{Deserialize, Serialize};

/// Request body for every login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Envelope wrapping every backend response.
///
/// The profile location inside `data` depends on the role, so `data` stays
/// untyped here.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    /// Response payload.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Human-readable status message.
    #[serde(default)]
    pub message: Option<String>,
}
