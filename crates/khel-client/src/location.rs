//! Dashboard URL parsing and sub-route dispatch.

use crate::descriptor::{by_prefix, NavItem, RouteDescriptor};
use crate::normalize::segment_matches;
use crate::role::Role;
use crate::session::{DashboardIdentity, Session};

/// A URL path recognized as belonging to a dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLocation {
    /// Role owning the dashboard prefix.
    pub role: Role,
    /// Identifying segments after the prefix, percent-decoded. `None` when
    /// the path stops before all of them are present.
    pub identity: Option<Vec<String>>,
    /// Everything after the identifying segments, if anything.
    pub sub_path: Option<String>,
}

impl DashboardLocation {
    /// Parses a URL path. Query string and fragment are ignored.
    ///
    /// Returns `None` when the first segment is not a dashboard prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use khel_client::{DashboardLocation, Role};
    ///
    /// let loc = DashboardLocation::parse("/coach-dashboard/org1/jane-doe/reports").unwrap();
    /// assert_eq!(loc.role, Role::Coach);
    /// assert_eq!(loc.sub_path.as_deref(), Some("reports"));
    ///
    /// assert!(DashboardLocation::parse("/sign-up").is_none());
    /// ```
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        let descriptor = by_prefix(segments.next()?)?;
        let rest: Vec<String> = segments.map(decode).collect();

        let wanted = descriptor.shape.segment_count();
        if rest.len() < wanted {
            return Some(Self {
                role: descriptor.role,
                identity: None,
                sub_path: None,
            });
        }

        let (identity, sub) = rest.split_at(wanted);
        Some(Self {
            role: descriptor.role,
            identity: Some(identity.to_vec()),
            sub_path: (!sub.is_empty()).then(|| sub.join("/")),
        })
    }

    /// Whether every identifying segment is present.
    pub fn is_complete(&self) -> bool {
        self.identity.is_some()
    }

    /// Checks the URL identity against a session.
    ///
    /// Organization ids compare exactly; names compare after normalization,
    /// so case and spacing differences in a hand-typed link still match.
    pub fn matches(&self, session: &Session) -> bool {
        if self.role != session.role() {
            return false;
        }
        let Some(segments) = &self.identity else {
            return false;
        };

        match (session.identity(), segments.as_slice()) {
            (DashboardIdentity::Organization { organization_id }, [org]) => org == organization_id,
            (
                DashboardIdentity::Member {
                    organization_id,
                    name,
                },
                [org, segment],
            ) => org == organization_id && segment_matches(name, segment),
            (DashboardIdentity::Named { name }, [segment]) => segment_matches(name, segment),
            _ => false,
        }
    }

    /// Dispatches the sub-path against the role's navigation.
    pub fn sub_route(&self) -> SubRoute {
        SubRoute::dispatch(crate::descriptor::descriptor(self.role), self.sub_path.as_deref())
    }
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Which view inside a dashboard a sub-path selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubRoute {
    /// Dashboard root; renders the default navigation item.
    Index,
    /// A known navigation entry.
    Item(&'static NavItem),
    /// Unknown sub-path; rendered by the dashboard's fallback view.
    Fallback(String),
}

impl SubRoute {
    /// Maps a sub-path to a navigation item of the descriptor.
    pub fn dispatch(descriptor: &'static RouteDescriptor, sub_path: Option<&str>) -> Self {
        let Some(sub_path) = sub_path.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) else {
            return SubRoute::Index;
        };
        match descriptor.nav_item(sub_path) {
            Some(item) => SubRoute::Item(item),
            None => {
                tracing::debug!(role = %descriptor.role, sub_path, "Unknown dashboard sub-path");
                SubRoute::Fallback(sub_path.to_string())
            }
        }
    }

    /// The navigation entry to highlight, if any.
    pub fn active_item(&self, descriptor: &'static RouteDescriptor) -> Option<&'static NavItem> {
        match self {
            SubRoute::Index => Some(descriptor.default_item()),
            SubRoute::Item(item) => Some(item),
            SubRoute::Fallback(_) => None,
        }
    }
}
