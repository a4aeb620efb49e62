use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use keystone_auth::AuthError;

/// Authentication failures are reported uniformly; the reason stays in logs.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    if err.is_authentication_failure() {
        tracing::debug!(reason = err.code(), "unauthenticated");
        return json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required");
    }

    match err {
        AuthError::TenantMismatch => json_error(
            StatusCode::FORBIDDEN,
            "tenant_isolation",
            "resource belongs to another tenant",
        ),
        other => json_error(StatusCode::FORBIDDEN, other.code(), other.to_string()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use keystone_auth::Role;

    use super::*;

    #[test]
    fn token_failures_collapse_to_401() {
        for e in [
            AuthError::TokenExpired,
            AuthError::TokenBadSignature,
            AuthError::claims_incomplete("sub"),
        ] {
            assert_eq!(auth_error_to_response(e).status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn authorization_failures_are_403() {
        let e = AuthError::InsufficientRole {
            actual: Role::Viewer,
            required: "delete on leads".to_string(),
        };
        assert_eq!(auth_error_to_response(e).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            auth_error_to_response(AuthError::TenantMismatch).status(),
            StatusCode::FORBIDDEN
        );
    }
}
