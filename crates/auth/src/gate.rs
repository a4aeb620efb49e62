//! Fine-grained permission checks against the shared catalog.
//!
//! Used both to decide what UI affordances to offer and for server-side
//! checks after the route guard. There is no other policy table.

use serde::Serialize;

use crate::{Action, AuthError, Identity, PermissionCatalog, Resource, Role};

/// `can(None, ..)` is always `false`.
pub fn can(
    catalog: &PermissionCatalog,
    identity: Option<&Identity>,
    resource: impl AsRef<str>,
    action: Action,
) -> bool {
    identity.is_some_and(|i| catalog.has(i.role, resource, action))
}

/// Immutable view of what a (possibly absent) role may do.
#[derive(Debug, Copy, Clone)]
pub struct PermissionGate<'a> {
    catalog: &'a PermissionCatalog,
    role: Option<Role>,
}

impl<'a> PermissionGate<'a> {
    pub fn new(catalog: &'a PermissionCatalog, role: Option<Role>) -> Self {
        Self { catalog, role }
    }

    pub fn for_identity(catalog: &'a PermissionCatalog, identity: Option<&Identity>) -> Self {
        Self::new(catalog, identity.map(|i| i.role))
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn can(&self, resource: impl AsRef<str>, action: Action) -> bool {
        self.role.is_some_and(|r| self.catalog.has(r, resource, action))
    }

    pub fn can_create(&self, resource: impl AsRef<str>) -> bool {
        self.can(resource, Action::Create)
    }

    pub fn can_read(&self, resource: impl AsRef<str>) -> bool {
        self.can(resource, Action::Read)
    }

    pub fn can_update(&self, resource: impl AsRef<str>) -> bool {
        self.can(resource, Action::Update)
    }

    pub fn can_delete(&self, resource: impl AsRef<str>) -> bool {
        self.can(resource, Action::Delete)
    }

    pub fn can_manage(&self, resource: impl AsRef<str>) -> bool {
        self.role.is_some_and(|r| self.catalog.can_manage(r, resource))
    }

    pub fn is_at_least(&self, required: Role) -> bool {
        self.role.is_some_and(|r| r.at_least(required))
    }

    /// Server-side form of [`can`](Self::can).
    pub fn require(&self, resource: impl AsRef<str>, action: Action) -> Result<(), AuthError> {
        let resource = resource.as_ref();
        let Some(role) = self.role else {
            return Err(AuthError::TokenAbsent);
        };
        if self.catalog.has(role, resource, action) {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole {
                actual: role,
                required: format!("{action} on {resource}"),
            })
        }
    }

    /// Per-resource abilities, for clients that gate rendering.
    pub fn abilities(&self) -> Vec<Ability> {
        let Some(role) = self.role else {
            return Vec::new();
        };
        self.catalog
            .permissions_for(role)
            .iter()
            .map(|p| Ability {
                resource: p.resource.clone(),
                actions: p.actions.iter().copied().collect(),
                can_manage: self.catalog.can_manage(role, &p.resource),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub resource: Resource,
    pub actions: Vec<Action>,
    pub can_manage: bool,
}
