//! Identity endpoints consumed by clients for UI gating.
//!
//! Clients may cache what `/api/auth/me` returns, but every mutating call is
//! re-checked server-side through `authz`.

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use keystone_auth::Action;

use crate::app::errors;
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub resource: String,
    pub action: String,
}

/// GET /api/auth/me
pub async fn me(principal: Option<Extension<PrincipalContext>>) -> axum::response::Response {
    let Some(Extension(principal)) = principal else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        );
    };

    let gate = authz::gate_for(Some(&principal));
    let identity = principal.identity();
    (
        StatusCode::OK,
        Json(json!({
            "userId": identity.user_id.to_string(),
            "email": identity.email,
            "tenantId": identity.tenant_id.to_string(),
            "role": identity.role,
            "tenant": identity.tenant,
            "expiresAt": identity.expires_at,
            "abilities": gate.abilities(),
        })),
    )
        .into_response()
}

/// GET /api/permissions/check?resource=leads&action=delete
pub async fn check_permission(
    tenant: Option<Extension<TenantContext>>,
    principal: Option<Extension<PrincipalContext>>,
    Query(query): Query<CheckQuery>,
) -> axum::response::Response {
    let (Some(Extension(tenant)), Some(Extension(principal))) = (tenant, principal) else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        );
    };

    let action = match query.action.parse::<Action>() {
        Ok(action) => action,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_action", e.to_string());
        }
    };

    match authz::authorize_action(&tenant, &principal, &query.resource, action) {
        Ok(()) => Json(json!({
            "allowed": true,
            "resource": query.resource,
            "action": action,
        }))
        .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
