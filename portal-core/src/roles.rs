use crate::error::PortalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "OPS")]
    Ops,
    #[serde(rename = "FINANCE")]
    Finance,
    #[serde(rename = "CSM")]
    Csm,
}

/// Presentation metadata for one department. Read-only for the process lifetime.
#[derive(Debug, PartialEq, Eq)]
pub struct RoleConfig {
    pub name: &'static str,
    pub color: &'static str,
    pub color_class: &'static str,
    pub icon: &'static str,
    pub user_id: &'static str,
    pub path: &'static str,
    pub portal_title: &'static str,
    pub persona: &'static str,
}

static IT_CONFIG: RoleConfig = RoleConfig {
    name: "IT",
    color: "#3B82F6",
    color_class: "it",
    icon: "🔧",
    user_id: "it-demo-001",
    path: "/it",
    portal_title: "IT Console",
    persona: "IT Admin",
};

static OPS_CONFIG: RoleConfig = RoleConfig {
    name: "Operations",
    color: "#8B5CF6",
    color_class: "ops",
    icon: "📊",
    user_id: "ops-demo-001",
    path: "/operations",
    portal_title: "Operations Dashboard",
    persona: "Operations Director",
};

static FINANCE_CONFIG: RoleConfig = RoleConfig {
    name: "Finance",
    color: "#10B981",
    color_class: "finance",
    icon: "💰",
    user_id: "finance-demo-001",
    path: "/finance",
    portal_title: "Finance Portal",
    persona: "Finance Controller",
};

static CSM_CONFIG: RoleConfig = RoleConfig {
    name: "Customer Service",
    color: "#F59E0B",
    color_class: "csm",
    icon: "🎧",
    user_id: "csm-demo-001",
    path: "/customer-service",
    portal_title: "Customer Service Portal",
    persona: "Customer Success Manager",
};

impl Role {
    pub const ALL: [Role; 4] = [Role::It, Role::Ops, Role::Finance, Role::Csm];

    /// Wire tag, as sent in `X-User-Role`.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::It => "IT",
            Role::Ops => "OPS",
            Role::Finance => "FINANCE",
            Role::Csm => "CSM",
        }
    }

    pub fn config(self) -> &'static RoleConfig {
        match self {
            Role::It => &IT_CONFIG,
            Role::Ops => &OPS_CONFIG,
            Role::Finance => &FINANCE_CONFIG,
            Role::Csm => &CSM_CONFIG,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.config().name
    }

    pub fn from_path(path: &str) -> Option<Role> {
        let trimmed = path.trim_end_matches('/');
        Role::ALL.into_iter().find(|r| r.config().path == trimmed)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IT" => Ok(Role::It),
            "OPS" => Ok(Role::Ops),
            "FINANCE" => Ok(Role::Finance),
            "CSM" => Ok(Role::Csm),
            _ => Err(PortalError::UnknownRole(s.to_string())),
        }
    }
}
