//! Dashboard route descriptors.
//!
//! A static table mapping each [`Role`] to its dashboard prefix, the identity
//! fields its URLs carry, its navigation entries and its auth endpoints.
//! Routing code dispatches through this table instead of branching on roles.

use serde::Serialize;

use crate::role::Role;

/// Icon identifiers for navigation items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Activity,
    Apple,
    BarChart,
    Calendar,
    Clipboard,
    Dumbbell,
    Heart,
    Home,
    Hospital,
    LineChart,
    MessageSquare,
    PiggyBank,
    Salad,
    User,
    Users,
}

/// One entry of a dashboard's side navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Text shown to the user.
    pub label: &'static str,
    /// Icon shown next to the label.
    pub icon: Icon,
    /// Sub-path relative to the dashboard base path.
    pub path: &'static str,
}

/// Which profile fields a role's dashboard URL is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityShape {
    /// `/{prefix}/{organizationId}`
    Organization,
    /// `/{prefix}/{organizationId}/{normalizedName}`
    Member,
    /// `/{prefix}/{normalizedName}`
    Named,
}

impl IdentityShape {
    /// Number of identifying path segments after the prefix.
    pub fn segment_count(&self) -> usize {
        match self {
            IdentityShape::Organization | IdentityShape::Named => 1,
            IdentityShape::Member => 2,
        }
    }
}

/// Backend endpoints a role authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthEndpoints {
    /// Login path, relative to the API base URL.
    pub login: &'static str,
    /// Logout path, if the backend offers one for this role.
    pub logout: Option<&'static str>,
    /// Key under `data` holding the profile in the login response.
    pub profile_key: &'static str,
}

/// Static routing configuration for one role.
#[derive(Debug, Clone, Copy)]
pub struct RouteDescriptor {
    /// Role this descriptor belongs to.
    pub role: Role,
    /// First path segment of every dashboard URL for the role.
    pub prefix: &'static str,
    /// Identity fields carried in the URL.
    pub shape: IdentityShape,
    /// Sub-path opened right after login or recovery.
    pub default_path: &'static str,
    /// Navigation entries, in display order.
    pub nav: &'static [NavItem],
    /// Auth endpoints, `None` when the role cannot log in directly.
    pub auth: Option<AuthEndpoints>,
}

impl RouteDescriptor {
    /// Finds the navigation item for a sub-path.
    pub fn nav_item(&self, path: &str) -> Option<&'static NavItem> {
        self.nav.iter().find(|item| item.path == path)
    }

    /// The navigation item opened by default.
    pub fn default_item(&self) -> &'static NavItem {
        // Every table entry lists its default path among its nav items;
        // checked by `test_default_path_is_a_nav_item`.
        let nav: &'static [NavItem] = self.nav;
        self.nav_item(self.default_path).unwrap_or(&nav[0])
    }
}

const fn nav(label: &'static str, icon: Icon, path: &'static str) -> NavItem {
    NavItem { label, icon, path }
}

const ADMIN_NAV: &[NavItem] = &[
    nav("Athlete Management", Icon::User, "athletes"),
    nav("Coach Management", Icon::Dumbbell, "coach"),
    nav("Video Analysis", Icon::Heart, "video"),
    nav("Admin Management", Icon::Users, "admin"),
    nav("Sponsor Management", Icon::PiggyBank, "sponsor"),
    nav("Form Management", Icon::BarChart, "form"),
];

const COACH_NAV: &[NavItem] = &[
    nav("Team Management", Icon::Users, "teammanagement"),
    nav("Performance Monitoring", Icon::LineChart, "performance"),
    nav("Training Plans", Icon::Calendar, "training"),
    nav("Injury Management", Icon::Activity, "injury"),
    nav("Communication", Icon::MessageSquare, "communication"),
    nav("Reports and Analytics", Icon::BarChart, "reports"),
    nav("Profile", Icon::User, "coach-profile"),
];

const ASSISTANT_COACH_NAV: &[NavItem] = &[
    nav("Team Management", Icon::Users, "team"),
    nav("Performance Monitoring", Icon::LineChart, "monitoring"),
    nav("Training Plans", Icon::Calendar, "training"),
    nav("Injury Management", Icon::Activity, "injury"),
    nav("Communication", Icon::MessageSquare, "chat"),
    nav("Reports and Analytics", Icon::BarChart, "report"),
    nav("Profile", Icon::User, "acprofile"),
];

const ATHLETE_NAV: &[NavItem] = &[
    nav("Home", Icon::Home, "home"),
    nav("Performance", Icon::BarChart, "performance"),
    nav("Training", Icon::Dumbbell, "training"),
    nav("Medical", Icon::Heart, "medical"),
    nav("Nutrition", Icon::Apple, "nutrition"),
    nav("Finance", Icon::PiggyBank, "finance"),
    nav("Profile", Icon::User, "profile"),
];

const MEDICAL_STAFF_NAV: &[NavItem] = &[
    nav("View Athletes", Icon::Users, "viewplayers"),
    nav("Nutrition", Icon::Salad, "diet"),
    nav("Medical Records", Icon::Hospital, "medicalrecords"),
    nav("Injury Records", Icon::Clipboard, "injurylogs"),
    nav("Announcements", Icon::MessageSquare, "announcements"),
];

const SPONSOR_NAV: &[NavItem] = &[
    nav("View Metrics", Icon::Users, "viewmetrics"),
    nav("Analytics", Icon::Clipboard, "analytics"),
    nav("Events", Icon::Calendar, "events"),
    nav("Investment Tracking", Icon::Clipboard, "investment"),
    nav("Communication", Icon::MessageSquare, "contact"),
];

static DESCRIPTORS: [RouteDescriptor; 6] = [
    RouteDescriptor {
        role: Role::Admin,
        prefix: "admin-dashboard",
        shape: IdentityShape::Organization,
        default_path: "athletes",
        nav: ADMIN_NAV,
        auth: Some(AuthEndpoints {
            login: "/api/v1/auth/admin/login",
            logout: None,
            profile_key: "admin",
        }),
    },
    RouteDescriptor {
        role: Role::Coach,
        prefix: "coach-dashboard",
        shape: IdentityShape::Member,
        default_path: "teammanagement",
        nav: COACH_NAV,
        auth: Some(AuthEndpoints {
            login: "/api/v1/auth/coach/login",
            logout: None,
            profile_key: "coach",
        }),
    },
    RouteDescriptor {
        role: Role::AssistantCoach,
        prefix: "assistantcoach-dashboard",
        shape: IdentityShape::Member,
        default_path: "team",
        nav: ASSISTANT_COACH_NAV,
        auth: None,
    },
    RouteDescriptor {
        role: Role::Athlete,
        prefix: "athlete-dashboard",
        shape: IdentityShape::Member,
        default_path: "home",
        nav: ATHLETE_NAV,
        auth: Some(AuthEndpoints {
            login: "/api/v1/auth/athlete/login",
            logout: None,
            profile_key: "athlete",
        }),
    },
    RouteDescriptor {
        role: Role::MedicalStaff,
        prefix: "medicalstaff-dashboard",
        shape: IdentityShape::Member,
        default_path: "viewplayers",
        nav: MEDICAL_STAFF_NAV,
        auth: None,
    },
    RouteDescriptor {
        role: Role::Sponsor,
        prefix: "sponsor-dashboard",
        shape: IdentityShape::Named,
        default_path: "viewmetrics",
        nav: SPONSOR_NAV,
        auth: Some(AuthEndpoints {
            login: "/api/v1/sponsors/login",
            logout: Some("/api/v1/sponsors/logout"),
            profile_key: "user",
        }),
    },
];

/// Returns the descriptor for a role.
pub fn descriptor(role: Role) -> &'static RouteDescriptor {
    let index = match role {
        Role::Admin => 0,
        Role::Coach => 1,
        Role::AssistantCoach => 2,
        Role::Athlete => 3,
        Role::MedicalStaff => 4,
        Role::Sponsor => 5,
    };
    &DESCRIPTORS[index]
}

/// Finds the descriptor whose dashboard prefix matches a path segment.
pub fn by_prefix(prefix: &str) -> Option<&'static RouteDescriptor> {
    DESCRIPTORS.iter().find(|d| d.prefix == prefix)
}

/// All descriptors, in [`Role::ALL`] order.
pub fn all() -> &'static [RouteDescriptor] {
    &DESCRIPTORS
}
