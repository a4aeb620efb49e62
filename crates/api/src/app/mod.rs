//! HTTP application wiring (Axum router + guard middleware).
//!
//! - `routes/`: HTTP handlers (one file per area)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use keystone_auth::{Hs256Codec, IdentityResolver, RouteGuard};

use crate::config::ApiConfig;
use crate::middleware;

pub mod errors;
pub mod routes;

/// Build the full HTTP router with the default route table.
pub fn build_app(config: &ApiConfig) -> Router {
    build_app_with_guard(config, RouteGuard::default())
}

/// Every request passes the guard; classification decides what it means.
pub fn build_app_with_guard(config: &ApiConfig, guard: RouteGuard) -> Router {
    let codec = Arc::new(Hs256Codec::new(config.jwt_secret.as_bytes()));
    let guard = Arc::new(guard);
    let state = middleware::GuardState {
        resolver: IdentityResolver::new(codec),
        guard: guard.clone(),
        cookie_name: Arc::from(config.auth_cookie.as_str()),
    };

    routes::router()
        .layer(Extension(guard))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(state, middleware::guard_middleware)),
        )
}
