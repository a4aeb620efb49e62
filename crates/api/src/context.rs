use keystone_auth::{Identity, IdentityContext, Role};
use keystone_core::{TenantId, UserId};

/// Headers carrying identity context to downstream handlers.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const TENANT_ID_HEADER: &str = "x-tenant-id";
pub const ROLE_HEADER: &str = "x-user-role";

pub const IDENTITY_HEADERS: [&str; 3] = [USER_ID_HEADER, TENANT_ID_HEADER, ROLE_HEADER];

/// Tenant context for a request.
///
/// Only ever inserted by the guard middleware, from a verified identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Principal context for a request (verified identity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    identity: Identity,
}

impl PrincipalContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn user_id(&self) -> UserId {
        self.identity.user_id
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn context(&self) -> IdentityContext {
        IdentityContext::from(&self.identity)
    }
}
