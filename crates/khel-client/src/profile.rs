//! Profile records returned by the login endpoints.

use serde::{Deserialize, Serialize};

/// Organization reference inside a profile.
///
/// The backend sends either the bare id or, when the relation is populated,
/// an object carrying the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrganizationRef {
    /// Bare organization id.
    Id(String),
    /// Populated organization document.
    Populated {
        /// Document id (`_id`).
        #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// The `id` virtual, sent alongside `_id` when virtuals are enabled.
        #[serde(default, rename = "id", skip_serializing_if = "Option::is_none")]
        virtual_id: Option<String>,
        /// Organization display name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl OrganizationRef {
    /// The organization id, whichever form was sent. `_id` wins over `id`.
    pub fn id(&self) -> Option<&str> {
        match self {
            OrganizationRef::Id(id) => Some(id),
            OrganizationRef::Populated { id, virtual_id, .. } => {
                first_non_blank([id.as_deref(), virtual_id.as_deref()])
            }
        }
    }
}

impl From<&str> for OrganizationRef {
    fn from(id: &str) -> Self {
        OrganizationRef::Id(id.to_string())
    }
}

/// A role-shaped account record.
///
/// Every field is optional on the wire; which ones are required depends on
/// the role and is checked when a [`Session`](crate::session::Session) is
/// built. Alternative keys for the same value are kept as separate fields,
/// so records carrying several of them still parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Backend document id (`_id`).
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The `id` virtual.
    #[serde(default, rename = "id", skip_serializing_if = "Option::is_none")]
    pub virtual_id: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, rename = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default, rename = "coachName", skip_serializing_if = "Option::is_none")]
    pub coach_name: Option<String>,

    #[serde(default, rename = "companyName", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Owning organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationRef>,
}

impl Profile {
    /// Creates a profile with a name and organization id.
    pub fn member(name: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            organization: Some(OrganizationRef::Id(organization.into())),
            ..Self::default()
        }
    }

    /// Document id, preferring `_id` over the `id` virtual.
    pub fn document_id(&self) -> Option<&str> {
        first_non_blank([self.id.as_deref(), self.virtual_id.as_deref()])
    }

    /// Display name: `name`, then `fullName`, `coachName`, `companyName`.
    /// Blank values are skipped.
    pub fn display_name(&self) -> Option<&str> {
        first_non_blank([
            self.name.as_deref(),
            self.full_name.as_deref(),
            self.coach_name.as_deref(),
            self.company_name.as_deref(),
        ])
    }

    /// Organization id, if present and not blank.
    pub fn organization_id(&self) -> Option<&str> {
        self.organization
            .as_ref()
            .and_then(OrganizationRef::id)
            .and_then(|id| first_non_blank([Some(id)]))
    }
}

fn first_non_blank<'a, const N: usize>(values: [Option<&'a str>; N]) -> Option<&'a str> {
    values
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_from_coach_response() {
        let profile: Profile =
            serde_json::from_value(json!({"name": "Jane Doe", "organization": "org1"})).unwrap();
        assert_eq!(profile.display_name(), Some("Jane Doe"));
        assert_eq!(profile.organization_id(), Some("org1"));
        assert!(profile.document_id().is_none());
    }

    #[test]
    fn test_profile_with_populated_organization() {
        let profile: Profile = serde_json::from_value(json!({
            "_id": "a1",
            "email": "admin@club.in",
            "role": "admin",
            "organization": {"_id": "org9", "name": "Club", "organizationType": "school"}
        }))
        .unwrap();
        assert_eq!(profile.document_id(), Some("a1"));
        assert_eq!(profile.organization_id(), Some("org9"));
        assert!(profile.display_name().is_none());
    }

    #[test]
    fn test_profile_name_aliases() {
        let profile: Profile = serde_json::from_value(json!({"fullName": "Mary Kom"})).unwrap();
        assert_eq!(profile.display_name(), Some("Mary Kom"));

        let profile: Profile = serde_json::from_value(json!({"companyName": "Acme"})).unwrap();
        assert_eq!(profile.display_name(), Some("Acme"));
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let profile = Profile::member("   ", " ");
        assert!(profile.display_name().is_none());
        assert!(profile.organization_id().is_none());
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let json = serde_json::to_value(Profile::member("Jane Doe", "org1")).unwrap();
        assert_eq!(json, json!({"name": "Jane Doe", "organization": "org1"}));
    }

    #[test]
    fn test_record_with_both_id_keys() {
        let profile: Profile = serde_json::from_value(json!({
            "_id": "a1",
            "id": "a1",
            "name": "Sam Roy",
            "age": 19,
            "organization": {"_id": "org1", "id": "org1", "name": "Club"}
        }))
        .unwrap();
        assert_eq!(profile.document_id(), Some("a1"));
        assert_eq!(profile.organization_id(), Some("org1"));

        let only_virtual: Profile =
            serde_json::from_value(json!({"id": "v9", "organization": {"id": "org2"}})).unwrap();
        assert_eq!(only_virtual.document_id(), Some("v9"));
        assert_eq!(only_virtual.organization_id(), Some("org2"));
    }

    #[test]
    fn test_record_with_several_name_keys() {
        let profile: Profile = serde_json::from_value(json!({
            "name": "  ",
            "fullName": "Mary Kom",
            "companyName": "Acme"
        }))
        .unwrap();
        assert_eq!(profile.display_name(), Some("Mary Kom"));
    }

    #[test]
    fn test_record_with_both_id_keys_survives_persistence() {
        let raw = json!({"_id": "a1", "id": "a1", "name": "Sam Roy", "organization": "org1"});
        let profile: Profile = serde_json::from_value(raw).unwrap();
        let stored = serde_json::to_string(&profile).unwrap();
        let back: Profile = serde_json::from_str(&stored).unwrap();
        assert_eq!(back, profile);
    }
}
