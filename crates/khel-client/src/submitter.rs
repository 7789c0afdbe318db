//! # Credential Submitter
//!
//! Sends one login request for a selected role and, on success, writes the
//! session. One submitter backs one interactive trigger (a login form): it
//! refuses overlapping submissions and can be dismissed while a request is in
//! flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, KhelClient};
use crate::role::Role;
use crate::session::{Session, SessionError, SessionResult, SessionStore};

/// Message shown for every authentication failure.
///
/// Role-agnostic and silent about which field was wrong.
pub const AUTH_FAILED_MESSAGE: &str =
    "Sign-in failed. Check your email and password and try again.";

/// Credential fields rejected before any request is made.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required")]
    EmptyEmail,

    #[error("Password is required")]
    EmptyPassword,
}

/// Why a submission did not produce a session.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Empty credential fields. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Login request failed or its response was unusable.
    #[error("authentication failed: {0}")]
    Auth(#[from] ApiError),

    /// Login succeeded but the profile lacks fields the role needs.
    #[error("authentication failed: {0}")]
    InvalidProfile(SessionError),

    /// Another submission from this submitter is still running.
    #[error("a sign-in is already in progress")]
    InFlight,

    /// The submitter was dismissed before the response arrived.
    #[error("sign-in was dismissed")]
    Dismissed,

    /// A newer login or a sign-out won; this response was discarded.
    #[error("sign-in superseded by a newer sign-in or sign-out")]
    Superseded,

    /// The session could not be persisted.
    #[error("could not store session: {0}")]
    Storage(SessionError),
}

impl SubmitError {
    /// Text to show the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::Validation(ValidationError::EmptyEmail) => "Email is required",
            SubmitError::Validation(ValidationError::EmptyPassword) => "Password is required",
            SubmitError::Auth(_) | SubmitError::InvalidProfile(_) => AUTH_FAILED_MESSAGE,
            SubmitError::InFlight => "Sign-in already in progress",
            SubmitError::Dismissed | SubmitError::Superseded => "Sign-in cancelled",
            SubmitError::Storage(_) => "Signed in, but the session could not be saved",
        }
    }

    /// True for failures the user can fix by re-entering credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, SubmitError::Auth(_) | SubmitError::InvalidProfile(_))
    }
}

impl From<SessionError> for SubmitError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Superseded => SubmitError::Superseded,
            SessionError::MissingField { .. } | SessionError::InvalidField { .. } => {
                SubmitError::InvalidProfile(err)
            }
            other => SubmitError::Storage(other),
        }
    }
}

/// Validates credentials without touching the network.
///
/// # Errors
///
/// Returns the first empty field, email before password.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if password.trim().is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}

/// Releases the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Login driver for one interactive trigger.
///
/// # Examples
///
/// ```rust,ignore
/// let store = Arc::new(SessionStore::in_memory());
/// let submitter = CredentialSubmitter::new(client, Arc::clone(&store));
///
/// match submitter.submit(Role::Coach, "a@b.com", "secret").await {
///     Ok(session) => println!("Open {}", session.default_path()),
///     Err(e) => eprintln!("{}", e.user_message()),
/// }
/// ```
#[derive(Debug)]
pub struct CredentialSubmitter {
    client: KhelClient,
    store: Arc<SessionStore>,
    in_flight: AtomicBool,
    alive: CancellationToken,
}

impl CredentialSubmitter {
    pub fn new(client: KhelClient, store: Arc<SessionStore>) -> Self {
        Self {
            client,
            store,
            in_flight: AtomicBool::new(false),
            alive: CancellationToken::new(),
        }
    }

    /// Authenticates and writes the session.
    ///
    /// Credentials are checked first; an empty field fails without a request.
    /// The store sees [`AuthPhase::Authenticating`](crate::AuthPhase) until
    /// this future completes or is dropped.
    ///
    /// # Errors
    ///
    /// See [`SubmitError`]. No error path writes to the store.
    pub async fn submit(
        &self,
        role: Role,
        email: &str,
        password: &str,
    ) -> Result<Session, SubmitError> {
        validate_credentials(email, password)?;

        if self.alive.is_cancelled() {
            return Err(SubmitError::Dismissed);
        }

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            tracing::debug!(%role, "Ignoring duplicate sign-in");
            SubmitError::InFlight
        })?;

        let ticket = self.store.begin_login();
        let email = email.trim();

        let profile = tokio::select! {
            biased;
            () = self.alive.cancelled() => {
                tracing::info!(%role, ticket = ticket.seq(), "Sign-in dismissed while in flight");
                return Err(SubmitError::Dismissed);
            }
            result = self.client.login(role, email, password) => result.map_err(|e| {
                tracing::warn!(%role, error = %e, "Sign-in failed");
                SubmitError::Auth(e)
            })?,
        };

        if self.alive.is_cancelled() {
            return Err(SubmitError::Dismissed);
        }

        let session = self.store.commit(&ticket, role, profile).map_err(|e| {
            tracing::warn!(%role, error = %e, "Sign-in response not stored");
            SubmitError::from(e)
        })?;

        tracing::info!(%role, path = %session.default_path(), "Signed in");
        Ok(session)
    }

    /// Marks the initiating context as gone.
    ///
    /// An in-flight submission returns [`SubmitError::Dismissed`] at once and
    /// its response is never stored. Later submissions fail the same way.
    pub fn dismiss(&self) {
        self.alive.cancel();
    }

    /// Whether a submission is currently running.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Signs out: best-effort server logout, then always clears the session.
    ///
    /// # Errors
    ///
    /// Only local storage failures are reported; a failed server logout is
    /// logged and otherwise ignored.
    pub async fn sign_out(&self) -> SessionResult<()> {
        if let Some(session) = self.store.read() {
            let role = session.role();
            match self.client.logout(role).await {
                Ok(true) => tracing::info!(%role, "Logged out on server"),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(%role, error = %e, "Server logout failed, clearing local session")
                }
            }
        }
        self.store.clear()
    }
}
