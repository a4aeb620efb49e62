//! Static role → permission catalog.
//!
//! The catalog is configuration: built once, never mutated. Both the HTTP
//! layer and UI-facing endpoints read the same table through
//! [`crate::PermissionGate`].

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Resource tag (e.g. "properties").
///
/// Tags are opaque strings so new resources don't require a new enum variant;
/// an unknown tag simply has no grants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Cow<'static, str>);

impl Resource {
    pub const PROPERTIES: Resource = Resource(Cow::Borrowed("properties"));
    pub const LEADS: Resource = Resource(Cow::Borrowed("leads"));
    pub const USERS: Resource = Resource(Cow::Borrowed("users"));
    pub const PLANS: Resource = Resource(Cow::Borrowed("plans"));
    pub const SETTINGS: Resource = Resource(Cow::Borrowed("settings"));
    pub const REPORTS: Resource = Resource(Cow::Borrowed("reports"));
    pub const TENANT: Resource = Resource(Cow::Borrowed("tenant"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Resource {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    /// Actions that count as "managing" a resource.
    pub const MANAGE: [Action; 3] = [Action::Create, Action::Update, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grant of a set of actions on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub resource: Resource,
    pub actions: BTreeSet<Action>,
}

impl Permission {
    pub fn new(resource: Resource, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            resource,
            actions: actions.into_iter().collect(),
        }
    }

    /// All four actions on `resource`.
    pub fn crud(resource: Resource) -> Self {
        Self::new(resource, Action::ALL)
    }

    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

/// Immutable mapping Role → ordered list of permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCatalog {
    grants: HashMap<Role, Vec<Permission>>,
}

static BUILTIN: LazyLock<PermissionCatalog> = LazyLock::new(PermissionCatalog::default_grants);

impl PermissionCatalog {
    /// Build a catalog from an explicit table. Roles not present get nothing.
    pub fn from_grants(grants: impl IntoIterator<Item = (Role, Vec<Permission>)>) -> Self {
        Self {
            grants: grants.into_iter().collect(),
        }
    }

    /// The process-wide catalog shipped with the application.
    pub fn builtin() -> &'static PermissionCatalog {
        &BUILTIN
    }

    fn default_grants() -> Self {
        use Action::*;

        Self::from_grants([
            (
                Role::Admin,
                vec![
                    Permission::crud(Resource::PROPERTIES),
                    Permission::crud(Resource::LEADS),
                    Permission::crud(Resource::USERS),
                    Permission::crud(Resource::PLANS),
                    Permission::crud(Resource::SETTINGS),
                    Permission::crud(Resource::REPORTS),
                    Permission::crud(Resource::TENANT),
                ],
            ),
            (
                Role::Manager,
                vec![
                    Permission::crud(Resource::PROPERTIES),
                    Permission::crud(Resource::LEADS),
                    Permission::new(Resource::USERS, [Read, Update]),
                    Permission::new(Resource::PLANS, [Read]),
                    Permission::new(Resource::SETTINGS, [Read]),
                    Permission::new(Resource::REPORTS, [Read]),
                    Permission::new(Resource::TENANT, [Read]),
                ],
            ),
            (
                Role::Agent,
                vec![
                    Permission::new(Resource::PROPERTIES, [Create, Read, Update]),
                    Permission::crud(Resource::LEADS),
                    Permission::new(Resource::REPORTS, [Read]),
                ],
            ),
            (
                Role::Viewer,
                vec![
                    Permission::new(Resource::PROPERTIES, [Read]),
                    Permission::new(Resource::LEADS, [Read]),
                    Permission::new(Resource::REPORTS, [Read]),
                ],
            ),
        ])
    }

    pub fn permissions_for(&self, role: Role) -> &[Permission] {
        self.grants.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Unknown resource or action resolves to `false`.
    pub fn has(&self, role: Role, resource: impl AsRef<str>, action: Action) -> bool {
        let resource = resource.as_ref();
        self.permissions_for(role)
            .iter()
            .any(|p| p.resource.as_str() == resource && p.allows(action))
    }

    /// Create, update or delete.
    pub fn can_manage(&self, role: Role, resource: impl AsRef<str>) -> bool {
        let resource = resource.as_ref();
        Action::MANAGE.into_iter().any(|a| self.has(role, resource, a))
    }

    /// Actions `role` holds on `resource`, in declaration order.
    pub fn actions_for(&self, role: Role, resource: impl AsRef<str>) -> Vec<Action> {
        let resource = resource.as_ref();
        Action::ALL
            .into_iter()
            .filter(|a| self.has(role, resource, *a))
            .collect()
    }

    /// Roles granted `action` on `resource`, highest rank first.
    pub fn roles_with(&self, resource: impl AsRef<str>, action: Action) -> Vec<Role> {
        let resource = resource.as_ref();
        Role::ALL
            .into_iter()
            .filter(|r| self.has(*r, resource, action))
            .collect()
    }

    /// Auditable account of a single lookup.
    pub fn explain(&self, role: Role, resource: impl AsRef<str>, action: Action) -> Explanation {
        let resource = resource.as_ref();
        let granted = self.has(role, resource, action);
        let granted_actions = self.actions_for(role, resource);
        let reason = if granted {
            format!("{role} is granted '{action}' on '{resource}'")
        } else if granted_actions.is_empty() {
            format!("{role} has no grants on '{resource}'")
        } else {
            format!("{role} lacks '{action}' on '{resource}'")
        };

        Explanation {
            role,
            resource: resource.to_string(),
            action,
            granted,
            granted_actions,
            roles_granting: self.roles_with(resource, action),
            reason,
        }
    }
}

/// Result of [`PermissionCatalog::explain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub role: Role,
    pub resource: String,
    pub action: Action,
    pub granted: bool,
    pub granted_actions: Vec<Action>,
    pub roles_granting: Vec<Role>,
    pub reason: String,
}
