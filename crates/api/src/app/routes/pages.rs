//! Page endpoints. Rendering lives elsewhere; these only report what the
//! guard let through so the front end can render accordingly.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use keystone_auth::RouteGuard;

use crate::app::errors;
use crate::authz;
use crate::context::PrincipalContext;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub redirect: Option<String>,
}

pub async fn landing() -> impl IntoResponse {
    Json(json!({ "page": "landing" }))
}

/// GET /login — echoes the validated return path for the login form.
pub async fn login(
    Extension(guard): Extension<Arc<RouteGuard>>,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    let redirect = guard.safe_return_path(query.redirect.as_deref()).to_string();
    Json(json!({ "page": "login", "redirect": redirect }))
}

pub async fn signup() -> impl IntoResponse {
    Json(json!({ "page": "signup" }))
}

pub async fn signup_confirm() -> impl IntoResponse {
    Json(json!({ "page": "signup-confirm" }))
}

/// GET /dashboard — identity plus per-resource abilities for UI gating.
pub async fn dashboard(principal: Option<Extension<PrincipalContext>>) -> axum::response::Response {
    page_for("dashboard", principal)
}

pub async fn admin(principal: Option<Extension<PrincipalContext>>) -> axum::response::Response {
    page_for("admin", principal)
}

pub async fn settings(principal: Option<Extension<PrincipalContext>>) -> axum::response::Response {
    page_for("settings", principal)
}

// Reaching a protected page without a principal means the route table and
// router disagree; refuse rather than render.
fn page_for(
    page: &'static str,
    principal: Option<Extension<PrincipalContext>>,
) -> axum::response::Response {
    let Some(Extension(principal)) = principal else {
        tracing::warn!(page, "protected page reached without identity context");
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        );
    };

    let gate = authz::gate_for(Some(&principal));
    (
        StatusCode::OK,
        Json(json!({
            "page": page,
            "identity": principal.context(),
            "abilities": gate.abilities(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::Uri;

    use super::*;

    fn login_sees(location: &str) -> Option<String> {
        let uri: Uri = location.parse().unwrap();
        let Query(query) = Query::<LoginQuery>::try_from_uri(&uri).unwrap();
        query.redirect
    }

    #[test]
    fn return_path_survives_query_decoding() {
        let guard = RouteGuard::default();
        for requested in [
            "/dashboard",
            "/leads/a%2Fb",
            "/leads/a%26b",
            "/leads/100%25",
            "/leads/a&b",
        ] {
            let decision = guard.decide(requested, None);
            let location = guard.location(&decision).unwrap();
            assert_eq!(login_sees(&location).as_deref(), Some(requested), "{location}");
        }
    }
}
