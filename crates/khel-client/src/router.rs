//! # Role Router
//!
//! Decides which dashboard tree to mount for the current session, or where to
//! send the user instead.
//!
//! The router never stores anything itself. It reads the session it is given
//! and falls back to [`SessionStore::recover`] when that is empty, so a page
//! reload lands on the same dashboard as before.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::{NavItem, RouteDescriptor};
use crate::location::{DashboardLocation, SubRoute};
use crate::role::Role;
use crate::session::{Session, SessionError, SessionStore};

/// Where an unauthenticated user is sent.
pub const DEFAULT_SIGN_IN_PATH: &str = "/";

/// A link in a dashboard's navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// The navigation entry.
    pub item: &'static NavItem,
    /// Full URL path of the entry for this session.
    pub href: String,
    /// Whether this entry is the one being shown.
    pub active: bool,
}

/// The dashboard to mount for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTree {
    /// Role whose dashboard is mounted.
    pub role: Role,
    /// Prefix plus identifying segments.
    pub base_path: String,
    /// Where the dashboard opens by default.
    pub default_path: String,
    /// View selected inside the dashboard.
    pub sub_route: SubRoute,
    /// Navigation entries, in display order.
    pub links: Vec<NavLink>,
}

impl RouteTree {
    /// Builds the tree for a session with the given view selected.
    pub fn for_session(session: &Session, sub_route: SubRoute) -> Self {
        let descriptor = session.descriptor();
        let active = sub_route.active_item(descriptor);
        let links = descriptor
            .nav
            .iter()
            .map(|item| NavLink {
                item,
                href: session.path_for(item.path),
                active: active.is_some_and(|a| a.path == item.path),
            })
            .collect();

        Self {
            role: session.role(),
            base_path: session.base_path(),
            default_path: session.default_path(),
            sub_route,
            links,
        }
    }

    /// Descriptor of the mounted role.
    pub fn descriptor(&self) -> &'static RouteDescriptor {
        crate::descriptor::descriptor(self.role)
    }

    /// Full path of the view being shown.
    pub fn current_path(&self) -> String {
        match &self.sub_route {
            SubRoute::Index => self.default_path.clone(),
            SubRoute::Item(item) => format!("{}/{}", self.base_path, item.path),
            SubRoute::Fallback(rest) => {
                let rest: Vec<_> = rest.split('/').map(urlencoding::encode).collect();
                format!("{}/{}", self.base_path, rest.join("/"))
            }
        }
    }
}

/// Why the router redirected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectReason {
    /// No in-memory session; one was rebuilt from storage.
    Recovered(Role),
    /// No session anywhere.
    SessionMissing,
    /// Persisted role is outside the known set.
    UnrecognizedRole(String),
    /// The URL names a different user, organization or role.
    IdentityMismatch,
    /// The URL stops before all identifying segments.
    IncompleteLocation,
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectReason::Recovered(role) => write!(f, "recovered {role} session"),
            RedirectReason::SessionMissing => write!(f, "no session"),
            RedirectReason::UnrecognizedRole(role) => write!(f, "unrecognized role {role:?}"),
            RedirectReason::IdentityMismatch => write!(f, "identity mismatch"),
            RedirectReason::IncompleteLocation => write!(f, "incomplete dashboard path"),
        }
    }
}

/// A navigation the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Target URL path.
    pub to: String,
    /// Why.
    pub reason: RedirectReason,
}

/// Outcome of a routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Render this dashboard.
    Mount(RouteTree),
    /// Navigate elsewhere.
    Redirect(Redirect),
    /// The path is not a dashboard route; leave it to other handlers.
    Unmatched,
}

impl Resolution {
    /// URL path the user ends up on, if the router decides one.
    pub fn target_path(&self) -> Option<String> {
        match self {
            Resolution::Mount(tree) => Some(tree.current_path()),
            Resolution::Redirect(redirect) => Some(redirect.to.clone()),
            Resolution::Unmatched => None,
        }
    }
}

/// Maps sessions and URLs to dashboards.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use khel_client::{Profile, Resolution, Role, RoleRouter, SessionStore};
///
/// let store = Arc::new(SessionStore::in_memory());
/// let router = RoleRouter::new(Arc::clone(&store));
///
/// let session = store.write(Role::Coach, Profile::member("Jane Doe", "org1")).unwrap();
/// match router.resolve(Some(&session)) {
///     Resolution::Mount(tree) => {
///         assert_eq!(tree.default_path, "/coach-dashboard/org1/jane-doe/teammanagement");
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RoleRouter {
    store: Arc<SessionStore>,
    sign_in_path: String,
}

impl RoleRouter {
    /// Creates a router over a store, redirecting to `/` when signed out.
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
        }
    }

    /// Sets the sign-in path used for unauthenticated redirects.
    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    /// The sign-in path.
    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    /// Resolves the root of the app.
    ///
    /// With a session, mounts its dashboard on the default view. Without
    /// one, tries recovery and redirects to the recovered dashboard, or to
    /// sign-in.
    pub fn resolve(&self, session: Option<&Session>) -> Resolution {
        match session {
            Some(session) => Resolution::Mount(RouteTree::for_session(session, SubRoute::Index)),
            None => match self.recover() {
                Ok(session) => Resolution::Redirect(Redirect {
                    to: session.default_path(),
                    reason: RedirectReason::Recovered(session.role()),
                }),
                Err(redirect) => Resolution::Redirect(redirect),
            },
        }
    }

    /// Resolves using whatever session the store holds.
    pub fn resolve_current(&self) -> Resolution {
        self.resolve(self.store.read().as_ref())
    }

    /// Resolves a concrete URL path against a session.
    ///
    /// A dashboard path is mounted only when its role and identifying
    /// segments belong to the session; any other dashboard path redirects
    /// to the session's own dashboard. Without a session, recovery runs
    /// first, so reloading a deep link keeps the user where they were.
    pub fn resolve_location(&self, session: Option<&Session>, path: &str) -> Resolution {
        let Some(location) = DashboardLocation::parse(path) else {
            return Resolution::Unmatched;
        };

        let Some(session) = session else {
            return match self.recover() {
                Ok(recovered) if location.matches(&recovered) => {
                    Resolution::Mount(RouteTree::for_session(&recovered, location.sub_route()))
                }
                Ok(recovered) => Resolution::Redirect(Redirect {
                    to: recovered.default_path(),
                    reason: RedirectReason::Recovered(recovered.role()),
                }),
                Err(redirect) => Resolution::Redirect(redirect),
            };
        };

        if !location.is_complete() {
            return Resolution::Redirect(Redirect {
                to: session.default_path(),
                reason: RedirectReason::IncompleteLocation,
            });
        }

        if !location.matches(session) {
            tracing::warn!(
                role = %session.role(),
                path,
                "Dashboard path does not belong to the session"
            );
            return Resolution::Redirect(Redirect {
                to: session.default_path(),
                reason: RedirectReason::IdentityMismatch,
            });
        }

        Resolution::Mount(RouteTree::for_session(session, location.sub_route()))
    }

    /// Resolves a URL path using whatever session the store holds.
    pub fn resolve_current_location(&self, path: &str) -> Resolution {
        self.resolve_location(self.store.read().as_ref(), path)
    }

    fn recover(&self) -> Result<Session, Redirect> {
        match self.store.recover() {
            Ok(session) => Ok(session),
            Err(SessionError::UnrecognizedRole(role)) => {
                tracing::error!(role = %role, "Persisted session has an unrecognized role");
                Err(Redirect {
                    to: self.sign_in_path.clone(),
                    reason: RedirectReason::UnrecognizedRole(role),
                })
            }
            Err(e) => {
                tracing::debug!(error = %e, "No session to recover");
                Err(Redirect {
                    to: self.sign_in_path.clone(),
                    reason: RedirectReason::SessionMissing,
                })
            }
        }
    }
}
