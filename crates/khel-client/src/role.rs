//! Account roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::session::SessionError;

/// The closed set of account kinds.
///
/// Every role owns exactly one dashboard subtree; see
/// [`descriptor`](crate::descriptor::descriptor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Organization administrator.
    Admin,
    /// Head coach of an organization.
    Coach,
    /// Assistant coach of an organization.
    AssistantCoach,
    /// Athlete.
    Athlete,
    /// Physio, doctor or nutritionist attached to an organization.
    MedicalStaff,
    /// Sponsor looking for athletes to support.
    Sponsor,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Coach,
        Role::AssistantCoach,
        Role::Athlete,
        Role::MedicalStaff,
        Role::Sponsor,
    ];

    /// Canonical name, as stored in the `userType` slot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Coach => "Coach",
            Role::AssistantCoach => "AssistantCoach",
            Role::Athlete => "Athlete",
            Role::MedicalStaff => "MedicalStaff",
            Role::Sponsor => "Sponsor",
        }
    }

    /// Lowercase slug used in URLs and endpoint paths.
    pub fn slug(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coach => "coach",
            Role::AssistantCoach => "assistantcoach",
            Role::Athlete => "athlete",
            Role::MedicalStaff => "medicalstaff",
            Role::Sponsor => "sponsor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    /// Parses either the canonical name or the slug, ignoring case and
    /// surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.slug() == wanted)
            .ok_or_else(|| SessionError::UnrecognizedRole(s.to_string()))
    }
}
