use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use keystone_core::TenantId;

use crate::app::errors;
use crate::authz;
use crate::context::PrincipalContext;

/// GET /api/tenants/:tenant_id — only the caller's own tenant is visible.
pub async fn get_tenant(
    principal: Option<Extension<PrincipalContext>>,
    Path(tenant_id): Path<String>,
) -> axum::response::Response {
    let Some(Extension(principal)) = principal else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        );
    };

    let tenant_id = match tenant_id.parse::<TenantId>() {
        Ok(id) => id,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_tenant_id", e.to_string());
        }
    };

    if let Err(e) = authz::authorize_tenant(&principal, tenant_id) {
        tracing::info!(
            user_id = %principal.user_id(),
            requested = %tenant_id,
            "cross-tenant access refused"
        );
        return errors::auth_error_to_response(e);
    }

    let identity = principal.identity();
    Json(json!({
        "id": tenant_id.to_string(),
        "name": identity.tenant.as_ref().map(|t| t.name.clone()),
        "slug": identity.tenant.as_ref().map(|t| t.slug.to_string()),
    }))
    .into_response()
}
