use thiserror::Error;

use crate::Role;

/// Every way an authentication or authorization check can fail.
///
/// The first five variants are authentication failures: callers outside this
/// crate only ever observe them as "unauthenticated". The reason exists for
/// diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no credential presented")]
    TokenAbsent,

    #[error("token is malformed")]
    TokenMalformed,

    #[error("token has expired")]
    TokenExpired,

    #[error("token signature is invalid")]
    TokenBadSignature,

    #[error("claims incomplete: {0}")]
    ClaimsIncomplete(String),

    #[error("insufficient role: {actual} does not satisfy {required}")]
    InsufficientRole { actual: Role, required: String },

    #[error("tenant mismatch")]
    TenantMismatch,
}

impl AuthError {
    pub fn claims_incomplete(msg: impl Into<String>) -> Self {
        Self::ClaimsIncomplete(msg.into())
    }

    /// True when the subject is unknown (as opposed to known but not entitled).
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AuthError::TokenAbsent
                | AuthError::TokenMalformed
                | AuthError::TokenExpired
                | AuthError::TokenBadSignature
                | AuthError::ClaimsIncomplete(_)
        )
    }

    /// Stable machine-readable code, used in logs and JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::TokenAbsent => "token_absent",
            AuthError::TokenMalformed => "token_malformed",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenBadSignature => "token_bad_signature",
            AuthError::ClaimsIncomplete(_) => "claims_incomplete",
            AuthError::InsufficientRole { .. } => "insufficient_role",
            AuthError::TenantMismatch => "tenant_mismatch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_and_authorization_are_disjoint() {
        let authn = [
            AuthError::TokenAbsent,
            AuthError::TokenMalformed,
            AuthError::TokenExpired,
            AuthError::TokenBadSignature,
            AuthError::claims_incomplete("sub"),
        ];
        for e in authn {
            assert!(e.is_authentication_failure(), "{e}");
        }

        let authz = [
            AuthError::InsufficientRole {
                actual: Role::Viewer,
                required: "ADMIN".to_string(),
            },
            AuthError::TenantMismatch,
        ];
        for e in authz {
            assert!(!e.is_authentication_failure(), "{e}");
        }
    }

    #[test]
    fn display_mentions_roles() {
        let e = AuthError::InsufficientRole {
            actual: Role::Agent,
            required: "at least MANAGER".to_string(),
        };
        assert_eq!(e.to_string(), "insufficient role: AGENT does not satisfy at least MANAGER");
        assert_eq!(e.code(), "insufficient_role");
    }
}
