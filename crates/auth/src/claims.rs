use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use keystone_core::{TenantDescriptor, TenantId, UserId};

use crate::{AuthError, Role};

/// Signed identity claims as they travel inside the token.
///
/// Identity fields are kept as raw strings and tolerated as absent at decode
/// time: the token may be authentic yet incomplete, and it is the resolver's
/// job to reject that (see [`crate::IdentityResolver`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject (user) identifier.
    #[serde(default)]
    pub sub: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub tenant_id: String,

    #[serde(default)]
    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantClaim>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantClaim {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl From<&TenantDescriptor> for TenantClaim {
    fn from(t: &TenantDescriptor) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            slug: t.slug.to_string(),
        }
    }
}

impl Claims {
    /// Claims for a freshly issued token valid for `ttl` from `now`.
    ///
    /// Timestamps are truncated to whole seconds, matching the wire format.
    pub fn issue(
        user_id: UserId,
        email: impl Into<String>,
        tenant: &TenantDescriptor,
        role: Role,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let iat = truncate_to_seconds(now);
        Self {
            sub: user_id.to_string(),
            email: email.into(),
            tenant_id: tenant.id.to_string(),
            role: role.to_string(),
            tenant: Some(TenantClaim::from(tenant)),
            iat,
            exp: iat + ttl,
        }
    }

    /// Claims without a tenant descriptor (older issuers only send `tenantId`).
    pub fn issue_bare(
        user_id: UserId,
        email: impl Into<String>,
        tenant_id: TenantId,
        role: Role,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let iat = truncate_to_seconds(now);
        Self {
            sub: user_id.to_string(),
            email: email.into(),
            tenant_id: tenant_id.to_string(),
            role: role.to_string(),
            tenant: None,
            iat,
            exp: iat + ttl,
        }
    }
}

fn truncate_to_seconds(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(t.timestamp(), 0).unwrap_or(t)
}

/// Deterministically validate the claim time window.
///
/// Expiry is exclusive: a token whose `exp` equals `now` is already expired.
/// There is no grace window.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), AuthError> {
    if claims.exp <= claims.iat {
        return Err(AuthError::TokenMalformed);
    }
    if now >= claims.exp {
        return Err(AuthError::TokenExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn claims(iat: i64, exp: i64) -> Claims {
        Claims {
            sub: UserId::new().to_string(),
            email: "a@example.com".to_string(),
            tenant_id: TenantId::new().to_string(),
            role: "ADMIN".to_string(),
            tenant: None,
            iat: at(iat),
            exp: at(exp),
        }
    }

    #[test]
    fn expiry_is_exclusive() {
        let c = claims(1_000, 2_000);
        assert_eq!(validate_claims(&c, at(1_999)), Ok(()));
        assert_eq!(validate_claims(&c, at(2_000)), Err(AuthError::TokenExpired));
        assert_eq!(validate_claims(&c, at(2_001)), Err(AuthError::TokenExpired));
    }

    #[test]
    fn inverted_window_is_malformed() {
        let c = claims(2_000, 2_000);
        assert_eq!(validate_claims(&c, at(1_500)), Err(AuthError::TokenMalformed));
    }

    #[test]
    fn missing_identity_fields_still_deserialize() {
        let c: Claims = serde_json::from_str(r#"{"iat": 1, "exp": 2}"#).unwrap();
        assert!(c.sub.is_empty());
        assert!(c.tenant_id.is_empty());
        assert!(c.tenant.is_none());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(claims(1, 2)).unwrap();
        assert!(json.get("tenantId").is_some());
        assert_eq!(json["iat"], 1);
        assert_eq!(json["exp"], 2);
        assert!(json.get("tenant").is_none());
    }
}
