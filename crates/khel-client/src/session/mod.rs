//! # Session
//!
//! The authenticated identity of this client and where it is kept.
//!
//! - [`Session`] - validated role + profile pair
//! - [`SessionStore`] - in-memory session mirrored into a [`SessionBackend`]
//! - [`AuthPhase`] - login lifecycle state
//! - [`LoginTicket`] - ordering token for an in-flight login

mod backend;
mod error;
mod identity;
mod phase;
mod store;

pub use backend::{
    FileBackend, MemoryBackend, PersistedSlots, SessionBackend, PROFILE_SLOT, ROLE_SLOT,
};
pub use error::{SessionError, SessionResult};
pub use identity::{DashboardIdentity, Session};
pub use phase::AuthPhase;
pub use store::{LoginTicket, SessionStore};
