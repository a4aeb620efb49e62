use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role within a tenant.
///
/// The set is closed and totally ordered by [`Role::rank`]. This is the only
/// place rank is encoded; adding a role means touching this table and nothing
/// else.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Agent,
    Viewer,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    /// Highest rank first.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Agent, Role::Viewer];

    pub fn rank(self) -> u8 {
        match self {
            Role::Admin => 4,
            Role::Manager => 3,
            Role::Agent => 2,
            Role::Viewer => 1,
        }
    }

    /// `rank(self) >= rank(required)`.
    pub fn at_least(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Agent => "AGENT",
            Role::Viewer => "VIEWER",
        }
    }
}

/// Free-function form of [`Role::rank`].
pub fn rank(role: Role) -> u8 {
    role.rank()
}

/// Free-function form of [`Role::at_least`].
pub fn at_least(actual: Role, required: Role) -> bool {
    actual.at_least(required)
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Exact match on the wire form. Anything else is rejected rather than
    /// mapped to a default role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
