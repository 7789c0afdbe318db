//! Authentication phase.

use std::fmt;

use crate::role::Role;

/// Where the client is in the login lifecycle.
///
/// ```text
/// Unauthenticated -> Authenticating -> Authenticated(role) -> Unauthenticated
/// ```
///
/// `Authenticating` lasts exactly as long as a login ticket is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// No session.
    Unauthenticated,
    /// A login request is in flight.
    Authenticating,
    /// A session for the role is active.
    Authenticated(Role),
}

impl AuthPhase {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthPhase::Authenticated(_))
    }
}

impl fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthPhase::Unauthenticated => f.write_str("unauthenticated"),
            AuthPhase::Authenticating => f.write_str("authenticating"),
            AuthPhase::Authenticated(role) => write!(f, "authenticated as {role}"),
        }
    }
}
