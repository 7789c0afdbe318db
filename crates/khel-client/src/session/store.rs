//! The session store.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::profile::Profile;
use crate::role::Role;

use super::backend::{MemoryBackend, PersistedSlots, SessionBackend};
use super::error::{SessionError, SessionResult};
use super::identity::Session;
use super::phase::AuthPhase;

/// Process-wide session state, shared by the submitter and the router.
///
/// Holds at most one [`Session`] in memory and mirrors it into a
/// [`SessionBackend`]. Writes are ordered by login tickets: a login that
/// started earlier can never overwrite one that started later, and nothing
/// started before a [`clear`](Self::clear) can write after it.
///
/// # Examples
///
/// ```
/// use khel_client::{Profile, Role, SessionStore};
///
/// let store = SessionStore::in_memory();
/// store.write(Role::Coach, Profile::member("Jane Doe", "org1")).unwrap();
///
/// let session = store.read().unwrap();
/// assert_eq!(session.base_path(), "/coach-dashboard/org1/jane-doe");
///
/// store.clear().unwrap();
/// assert!(store.read().is_none());
/// ```
#[derive(Debug)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    state: RwLock<StoreState>,
    next_ticket: AtomicU64,
    phase_tx: watch::Sender<AuthPhase>,
}

#[derive(Debug, Default)]
struct StoreState {
    session: Option<Session>,
    /// Highest ticket that has written.
    committed: u64,
    /// Tickets at or below this were issued before the last clear.
    cleared_through: u64,
    /// Live login tickets.
    in_flight: usize,
    /// A clear left the persisted slots behind. Recovery is refused until
    /// storage is erased or written again.
    stale_storage: bool,
}

impl StoreState {
    fn phase(&self) -> AuthPhase {
        if self.in_flight > 0 {
            AuthPhase::Authenticating
        } else if let Some(session) = &self.session {
            AuthPhase::Authenticated(session.role())
        } else {
            AuthPhase::Unauthenticated
        }
    }
}

impl SessionStore {
    /// Creates a store over a backend. The in-memory session starts empty.
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        let (phase_tx, _) = watch::channel(AuthPhase::Unauthenticated);
        Self {
            backend,
            state: RwLock::new(StoreState::default()),
            next_ticket: AtomicU64::new(0),
            phase_tx,
        }
    }

    /// Creates a store with a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Returns the active session, if any.
    pub fn read(&self) -> Option<Session> {
        self.state.read().session.clone()
    }

    /// Validates and stores a session.
    ///
    /// Both fields are set together or the call fails with nothing changed.
    /// A plain write counts as the newest login, so older in-flight logins
    /// are discarded when they resolve.
    ///
    /// # Errors
    ///
    /// * [`SessionError::MissingField`] / [`SessionError::InvalidField`] -
    ///   profile unusable for the role
    /// * [`SessionError::Storage`] - the backend rejected the write
    pub fn write(&self, role: Role, profile: Profile) -> SessionResult<Session> {
        let seq = self.issue_ticket();
        self.commit_seq(seq, role, profile)
    }

    /// Starts a login and returns its ordering ticket.
    ///
    /// The phase is [`AuthPhase::Authenticating`] while any ticket is alive.
    pub fn begin_login(self: &Arc<Self>) -> LoginTicket {
        let seq = self.issue_ticket();
        let mut state = self.state.write();
        state.in_flight += 1;
        self.publish(&state);
        drop(state);

        tracing::debug!(ticket = seq, "Login started");
        LoginTicket {
            store: Arc::clone(self),
            seq,
        }
    }

    /// Stores the result of a login started with [`begin_login`](Self::begin_login).
    ///
    /// # Errors
    ///
    /// * [`SessionError::Superseded`] - a later login already wrote, or the
    ///   store was cleared after this login started
    /// * everything [`write`](Self::write) can return
    pub fn commit(&self, ticket: &LoginTicket, role: Role, profile: Profile) -> SessionResult<Session> {
        self.commit_seq(ticket.seq, role, profile)
    }

    /// Removes the session from memory and storage.
    ///
    /// Logins that are still in flight can no longer write. The in-memory
    /// session is cleared even when the backend fails, and the leftover
    /// slots are then never recovered.
    ///
    /// # Errors
    ///
    /// [`SessionError::Storage`] when the persisted slots could not be removed.
    pub fn clear(&self) -> SessionResult<()> {
        let mut state = self.state.write();
        state.session = None;
        state.cleared_through = self.next_ticket.load(Ordering::SeqCst);
        self.publish(&state);

        let result = self.backend.erase();
        state.stale_storage = result.is_err();
        drop(state);

        match &result {
            Ok(()) => tracing::info!("Session cleared"),
            Err(e) => tracing::warn!(error = %e, "Session cleared in memory only"),
        }
        result
    }

    /// Rebuilds the session from persisted slots.
    ///
    /// Used when the in-memory session is gone but storage may still hold
    /// one. On success the in-memory session is filled in if it is still
    /// empty. Calling this repeatedly over the same storage gives the same
    /// result.
    ///
    /// # Errors
    ///
    /// * [`SessionError::SessionMissing`] - slots missing, unreadable,
    ///   holding a profile unusable for the role, or left behind by a
    ///   [`clear`](Self::clear) whose erase failed (the erase is retried)
    /// * [`SessionError::UnrecognizedRole`] - role slot outside the known set
    pub fn recover(&self) -> SessionResult<Session> {
        {
            let mut state = self.state.write();
            if state.stale_storage {
                match self.backend.erase() {
                    Ok(()) => {
                        state.stale_storage = false;
                        tracing::info!("Erased session left behind by sign-out");
                    }
                    Err(e) => tracing::warn!(error = %e, "Signed-out session still in storage"),
                }
                return Err(SessionError::SessionMissing);
            }
        }

        let slots = self.backend.load().map_err(|e| {
            tracing::warn!(error = %e, "Failed to read persisted session");
            SessionError::SessionMissing
        })?;

        let (Some(user_type), Some(user_data)) = (slots.user_type, slots.user_data) else {
            tracing::debug!("Persisted session incomplete");
            return Err(SessionError::SessionMissing);
        };

        let role: Role = user_type.parse()?;
        let profile: Profile = serde_json::from_str(&user_data).map_err(|e| {
            tracing::warn!(%role, error = %e, "Persisted profile unreadable");
            SessionError::SessionMissing
        })?;
        let session = Session::new(role, profile).map_err(|e| {
            tracing::warn!(%role, error = %e, "Persisted profile unusable");
            SessionError::SessionMissing
        })?;

        let mut state = self.state.write();
        if state.session.is_none() {
            state.session = Some(session.clone());
            self.publish(&state);
            tracing::info!(%role, "Session recovered from storage");
        }

        Ok(session)
    }

    /// Current phase.
    pub fn phase(&self) -> AuthPhase {
        self.state.read().phase()
    }

    /// Subscribes to phase changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthPhase> {
        self.phase_tx.subscribe()
    }

    fn issue_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn commit_seq(&self, seq: u64, role: Role, profile: Profile) -> SessionResult<Session> {
        let session = Session::new(role, profile)?;
        let slots = PersistedSlots {
            user_type: Some(role.as_str().to_string()),
            user_data: Some(serde_json::to_string(session.profile())?),
        };

        let mut state = self.state.write();
        if seq <= state.committed || seq <= state.cleared_through {
            tracing::info!(ticket = seq, %role, "Discarding superseded login");
            return Err(SessionError::Superseded);
        }

        self.backend.save(&slots)?;
        state.session = Some(session.clone());
        state.committed = seq;
        state.stale_storage = false;
        self.publish(&state);

        tracing::info!(%role, path = %session.base_path(), "Session written");
        Ok(session)
    }

    fn publish(&self, state: &StoreState) {
        let phase = state.phase();
        self.phase_tx.send_if_modified(|current| {
            if *current == phase {
                return false;
            }
            tracing::debug!(from = %current, to = %phase, "Auth phase changed");
            *current = phase;
            true
        });
    }
}

/// Ordering token for one login attempt.
///
/// Dropping the ticket, on any path, ends its share of the
/// [`AuthPhase::Authenticating`] phase.
#[derive(Debug)]
pub struct LoginTicket {
    store: Arc<SessionStore>,
    seq: u64,
}

impl LoginTicket {
    /// Position of this login in start order.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for LoginTicket {
    fn drop(&mut self) {
        let mut state = self.store.state.write();
        state.in_flight = state.in_flight.saturating_sub(1);
        self.store.publish(&state);
    }
}
