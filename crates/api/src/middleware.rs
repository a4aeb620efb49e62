//! Guard middleware: parse credential → resolve identity → classify/decide →
//! attach identity context or redirect.
//!
//! Each stage is a plain function so it can be tested without a server.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, Request, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use keystone_auth::{Decision, Identity, IdentityContext, IdentityResolver, RouteGuard};

use crate::context::{
    IDENTITY_HEADERS, PrincipalContext, ROLE_HEADER, TENANT_ID_HEADER, TenantContext,
    USER_ID_HEADER,
};

#[derive(Clone)]
pub struct GuardState {
    pub resolver: IdentityResolver,
    pub guard: Arc<RouteGuard>,
    pub cookie_name: Arc<str>,
}

pub async fn guard_middleware(
    State(state): State<GuardState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    strip_identity_headers(req.headers_mut());

    let token = extract_credential(req.headers(), &state.cookie_name);
    let identity = state.resolver.resolve(token.as_deref(), Utc::now());
    let decision = state.guard.decide(req.uri().path(), identity.as_ref());

    if let Some(response) = enforce(&state.guard, &decision) {
        return response;
    }

    if let (Decision::AllowWithIdentity(ctx), Some(identity)) = (&decision, identity) {
        attach_identity(&mut req, *ctx, identity);
    }

    next.run(req).await
}

/// Cookie first, then `Authorization: Bearer`.
pub fn extract_credential(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    cookie_value(headers, cookie_name).or_else(|| bearer_token(headers))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Identity headers are only trusted when this middleware set them.
pub fn strip_identity_headers(headers: &mut HeaderMap) {
    for name in IDENTITY_HEADERS {
        headers.remove(name);
    }
}

/// Redirect response for a non-allow decision.
pub fn enforce(guard: &RouteGuard, decision: &Decision) -> Option<Response> {
    guard
        .location(decision)
        .map(|location| Redirect::temporary(&location).into_response())
}

pub fn attach_identity(
    req: &mut Request<axum::body::Body>,
    ctx: IdentityContext,
    identity: Identity,
) {
    let headers = req.headers_mut();
    for (name, value) in [
        (USER_ID_HEADER, ctx.user_id.to_string()),
        (TENANT_ID_HEADER, ctx.tenant_id.to_string()),
        (ROLE_HEADER, ctx.role.to_string()),
    ] {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }

    req.extensions_mut().insert(TenantContext::new(ctx.tenant_id));
    req.extensions_mut().insert(PrincipalContext::new(identity));
}
