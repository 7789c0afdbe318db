//! Session bootstrap and dashboard routing for the Khel sports-management app.
//!
//! This crate provides:
//! - **Credential Submitter**: validates credentials and signs in against the
//!   role's login endpoint, one request at a time
//! - **Session Store**: the authenticated role and profile, mirrored into
//!   persisted `userType` / `userData` slots
//! - **Role Router**: maps the session (or a URL) to the role's dashboard
//!   tree, recovering from storage after a reload
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use khel_client::{Profile, Resolution, Role, RoleRouter, SessionStore};
//!
//! let store = Arc::new(SessionStore::in_memory());
//! let router = RoleRouter::new(Arc::clone(&store));
//!
//! // Nothing stored yet: back to sign-in.
//! assert_eq!(router.resolve_current().target_path().as_deref(), Some("/"));
//!
//! // A coach signs in.
//! store.write(Role::Coach, Profile::member("Jane Doe", "org1")).unwrap();
//! assert_eq!(
//!     router.resolve_current().target_path().as_deref(),
//!     Some("/coach-dashboard/org1/jane-doe/teammanagement"),
//! );
//!
//! // Deep links into someone else's dashboard bounce back.
//! let resolution = router.resolve_current_location("/coach-dashboard/org2/john/reports");
//! assert!(matches!(resolution, Resolution::Redirect(_)));
//! ```

pub mod api;
pub mod config;
pub mod descriptor;
pub mod location;
pub mod normalize;
pub mod profile;
pub mod role;
pub mod router;
pub mod session;
pub mod submitter;

pub use api::{ApiError, ApiResult, KhelClient};
pub use config::{Config, ConfigError};
pub use descriptor::{Icon, IdentityShape, NavItem, RouteDescriptor};
pub use location::{DashboardLocation, SubRoute};
pub use profile::{OrganizationRef, Profile};
pub use role::Role;
pub use router::{NavLink, Redirect, RedirectReason, Resolution, RoleRouter, RouteTree};
pub use session::{
    AuthPhase, DashboardIdentity, FileBackend, LoginTicket, MemoryBackend, Session,
    SessionBackend, SessionError, SessionResult, SessionStore,
};
pub use submitter::{CredentialSubmitter, SubmitError, ValidationError, AUTH_FAILED_MESSAGE};
