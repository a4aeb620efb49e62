//! Server-side authorization for handlers running behind the route guard.
//!
//! Handlers call these instead of inspecting roles themselves, so the shared
//! permission catalog stays the only policy source.

use keystone_auth::{Action, AuthError, PermissionCatalog, PermissionGate};
use keystone_core::TenantId;

use crate::context::{PrincipalContext, TenantContext};

/// Gate for the current principal (or an anonymous gate).
pub fn gate_for(principal: Option<&PrincipalContext>) -> PermissionGate<'static> {
    PermissionGate::for_identity(PermissionCatalog::builtin(), principal.map(|p| p.identity()))
}

/// Require `action` on `resource` within the principal's own tenant.
pub fn authorize_action(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    resource: &str,
    action: Action,
) -> Result<(), AuthError> {
    principal.identity().ensure_tenant(tenant.tenant_id())?;
    gate_for(Some(principal)).require(resource, action)
}

/// Tenant isolation for a tenant-scoped path parameter.
pub fn authorize_tenant(
    principal: &PrincipalContext,
    tenant_id: TenantId,
) -> Result<(), AuthError> {
    principal.identity().ensure_tenant(tenant_id)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use keystone_auth::{Identity, Resource, Role};
    use keystone_core::UserId;

    use super::*;

    fn principal(role: Role, tenant_id: TenantId) -> PrincipalContext {
        let now = Utc::now();
        PrincipalContext::new(Identity {
            user_id: UserId::new(),
            email: "p@tenant.test".to_string(),
            tenant_id,
            role,
            tenant: None,
            issued_at: now,
            expires_at: now + Duration::minutes(30),
        })
    }

    #[test]
    fn manager_can_delete_leads_in_own_tenant() {
        let tenant_id = TenantId::new();
        let p = principal(Role::Manager, tenant_id);
        let t = TenantContext::new(tenant_id);
        assert!(authorize_action(&t, &p, Resource::LEADS.as_str(), Action::Delete).is_ok());
    }

    #[test]
    fn cross_tenant_context_is_rejected_before_role_check() {
        let p = principal(Role::Admin, TenantId::new());
        let other = TenantContext::new(TenantId::new());
        assert_eq!(
            authorize_action(&other, &p, Resource::LEADS.as_str(), Action::Read),
            Err(AuthError::TenantMismatch)
        );
    }

    #[test]
    fn viewer_cannot_update() {
        let tenant_id = TenantId::new();
        let p = principal(Role::Viewer, tenant_id);
        let err = authorize_action(&TenantContext::new(tenant_id), &p, "properties", Action::Update)
            .unwrap_err();
        assert!(matches!(err, AuthError::InsufficientRole { actual: Role::Viewer, .. }));
    }

    #[test]
    fn anonymous_gate_is_closed() {
        assert!(!gate_for(None).can_read(Resource::REPORTS));
    }

    #[test]
    fn tenant_param_check() {
        let tenant_id = TenantId::new();
        let p = principal(Role::Agent, tenant_id);
        assert!(authorize_tenant(&p, tenant_id).is_ok());
        assert_eq!(authorize_tenant(&p, TenantId::new()), Err(AuthError::TenantMismatch));
    }
}
