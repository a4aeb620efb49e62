use axum::{Router, routing::get};

pub mod pages;
pub mod session;
pub mod system;
pub mod tenants;

/// Every route; access is decided by the guard middleware, not here.
pub fn router() -> Router {
    Router::new()
        .route("/", get(pages::landing))
        .route("/health", get(system::health))
        .route("/login", get(pages::login))
        .route("/signup", get(pages::signup))
        .route("/signup/confirm", get(pages::signup_confirm))
        .route("/dashboard", get(pages::dashboard))
        .route("/admin", get(pages::admin))
        .route("/settings", get(pages::settings))
        .route("/api/auth/me", get(session::me))
        .route("/api/permissions/check", get(session::check_permission))
        .route("/api/tenants/:tenant_id", get(tenants::get_tenant))
}
