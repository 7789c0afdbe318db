//! Session errors.

use thiserror::Error;

use crate::role::Role;

/// Errors raised while building, storing or recovering a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The profile lacks a field the role's dashboard URL needs.
    #[error("{role} profile is missing required field `{field}`")]
    MissingField {
        /// Role the profile was checked against.
        role: Role,
        /// Missing field name.
        field: &'static str,
    },

    /// A profile field is present but cannot be placed in a URL.
    #[error("{role} profile field `{field}` is invalid: {reason}")]
    InvalidField {
        /// Role the profile was checked against.
        role: Role,
        /// Offending field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A role string outside the known set.
    #[error("unrecognized role: {0:?}")]
    UnrecognizedRole(String),

    /// No usable session in memory or in persisted storage.
    #[error("no usable session")]
    SessionMissing,

    /// A newer login or a sign-out happened after this login started.
    #[error("login superseded by a newer login or sign-out")]
    Superseded,

    /// Persisted storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Persisted data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
