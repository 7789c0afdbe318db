//! The validated session value.

use crate::descriptor::{descriptor, IdentityShape, RouteDescriptor};
use crate::normalize::normalize_segment;
use crate::profile::Profile;
use crate::role::Role;

use super::error::{SessionError, SessionResult};

/// Identifying URL fields extracted from a profile.
///
/// The variant is fixed by the role's [`IdentityShape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardIdentity {
    /// Admin-style identity: organization only.
    Organization {
        /// Organization id.
        organization_id: String,
    },
    /// Coach/athlete-style identity: organization plus member name.
    Member {
        /// Organization id.
        organization_id: String,
        /// Normalized display name.
        name: String,
    },
    /// Sponsor-style identity: name only.
    Named {
        /// Normalized display name.
        name: String,
    },
}

impl DashboardIdentity {
    /// Extracts and validates the identity for a role.
    pub fn from_profile(role: Role, profile: &Profile) -> SessionResult<Self> {
        let identity = match descriptor(role).shape {
            IdentityShape::Organization => DashboardIdentity::Organization {
                organization_id: organization_id(role, profile)?,
            },
            IdentityShape::Member => DashboardIdentity::Member {
                organization_id: organization_id(role, profile)?,
                name: name_segment(role, profile)?,
            },
            IdentityShape::Named => DashboardIdentity::Named {
                name: name_segment(role, profile)?,
            },
        };
        Ok(identity)
    }

    /// URL segments in the order they follow the dashboard prefix.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            DashboardIdentity::Organization { organization_id } => vec![organization_id.as_str()],
            DashboardIdentity::Member {
                organization_id,
                name,
            } => vec![organization_id.as_str(), name.as_str()],
            DashboardIdentity::Named { name } => vec![name.as_str()],
        }
    }

    /// Organization id, for shapes that carry one.
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            DashboardIdentity::Organization { organization_id }
            | DashboardIdentity::Member {
                organization_id, ..
            } => Some(organization_id),
            DashboardIdentity::Named { .. } => None,
        }
    }

    /// Normalized name, for shapes that carry one.
    pub fn name(&self) -> Option<&str> {
        match self {
            DashboardIdentity::Member { name, .. } | DashboardIdentity::Named { name } => {
                Some(name)
            }
            DashboardIdentity::Organization { .. } => None,
        }
    }
}

fn organization_id(role: Role, profile: &Profile) -> SessionResult<String> {
    let id = profile
        .organization_id()
        .ok_or(SessionError::MissingField {
            role,
            field: "organization",
        })?;
    if id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
        return Err(SessionError::InvalidField {
            role,
            field: "organization",
            reason: "must be a single path segment",
        });
    }
    Ok(id.to_string())
}

fn name_segment(role: Role, profile: &Profile) -> SessionResult<String> {
    let name = profile
        .display_name()
        .ok_or(SessionError::MissingField { role, field: "name" })?;
    let segment = normalize_segment(name);
    if segment.is_empty() {
        return Err(SessionError::InvalidField {
            role,
            field: "name",
            reason: "has no letters or digits",
        });
    }
    Ok(segment)
}

/// An authenticated identity: role and profile, always set together.
///
/// The only way to obtain a `Session` is [`Session::new`], which checks that
/// the profile carries everything the role's dashboard URL needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    role: Role,
    profile: Profile,
    identity: DashboardIdentity,
}

impl Session {
    /// Validates a profile for a role and builds the session.
    ///
    /// # Errors
    ///
    /// * [`SessionError::MissingField`] - a required field is absent or blank
    /// * [`SessionError::InvalidField`] - a field cannot be used in a URL
    pub fn new(role: Role, profile: Profile) -> SessionResult<Self> {
        let identity = DashboardIdentity::from_profile(role, &profile)?;
        Ok(Self {
            role,
            profile,
            identity,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn identity(&self) -> &DashboardIdentity {
        &self.identity
    }

    /// The role's routing descriptor.
    pub fn descriptor(&self) -> &'static RouteDescriptor {
        descriptor(self.role)
    }

    /// Dashboard base path, e.g. `/coach-dashboard/org1/jane-doe`.
    ///
    /// Identity segments are percent-encoded; URL parsing decodes them, so
    /// the path always leads back to this session.
    pub fn base_path(&self) -> String {
        let mut path = format!("/{}", self.descriptor().prefix);
        for segment in self.identity.segments() {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }
        path
    }

    /// Path of a dashboard sub-route.
    pub fn path_for(&self, sub_path: &str) -> String {
        format!("{}/{}", self.base_path(), sub_path.trim_matches('/'))
    }

    /// Path opened right after login or recovery.
    pub fn default_path(&self) -> String {
        self.path_for(self.descriptor().default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::OrganizationRef;

    #[test]
    fn test_coach_session_paths() {
        let session = Session::new(Role::Coach, Profile::member("Jane Doe", "org1")).unwrap();
        assert_eq!(session.base_path(), "/coach-dashboard/org1/jane-doe");
        assert_eq!(
            session.default_path(),
            "/coach-dashboard/org1/jane-doe/teammanagement"
        );
        assert_eq!(
            session.path_for("/reports/"),
            "/coach-dashboard/org1/jane-doe/reports"
        );
    }

    #[test]
    fn test_admin_needs_only_organization() {
        let profile = Profile {
            organization: Some(OrganizationRef::Populated {
                id: Some("org7".into()),
                virtual_id: None,
                name: Some("Club".into()),
            }),
            ..Profile::default()
        };
        let session = Session::new(Role::Admin, profile).unwrap();
        assert_eq!(session.default_path(), "/admin-dashboard/org7/athletes");
        assert!(session.identity().name().is_none());
    }

    #[test]
    fn test_sponsor_needs_only_name() {
        let profile = Profile {
            name: Some("Acme Sports".into()),
            ..Profile::default()
        };
        let session = Session::new(Role::Sponsor, profile).unwrap();
        assert_eq!(session.default_path(), "/sponsor-dashboard/acme-sports/viewmetrics");
        assert!(session.identity().organization_id().is_none());
    }

    #[test]
    fn test_missing_organization_rejected() {
        let profile = Profile {
            name: Some("Jane Doe".into()),
            ..Profile::default()
        };
        let err = Session::new(Role::Coach, profile).unwrap_err();
        assert_eq!(
            err,
            SessionError::MissingField {
                role: Role::Coach,
                field: "organization"
            }
        );
    }

    #[test]
    fn test_missing_name_rejected() {
        let err = Session::new(Role::Athlete, Profile::member("  ", "org1")).unwrap_err();
        assert!(matches!(err, SessionError::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_unusable_values_rejected() {
        let err = Session::new(Role::Coach, Profile::member("!!!", "org1")).unwrap_err();
        assert!(matches!(err, SessionError::InvalidField { field: "name", .. }));

        let err = Session::new(Role::Coach, Profile::member("Jane", "org/1")).unwrap_err();
        assert!(matches!(err, SessionError::InvalidField { field: "organization", .. }));
    }

    #[test]
    fn test_organization_id_is_trimmed() {
        let session = Session::new(Role::Admin, Profile::member("x", " org1 ")).unwrap();
        assert_eq!(session.base_path(), "/admin-dashboard/org1");
    }

    #[test]
    fn test_identity_segments_are_encoded() {
        let session = Session::new(Role::Coach, Profile::member("José Müller", "org%41")).unwrap();
        assert_eq!(
            session.base_path(),
            "/coach-dashboard/org%2541/jos%C3%A9-m%C3%BCller"
        );
        assert_eq!(session.identity().organization_id(), Some("org%41"));
    }
}
