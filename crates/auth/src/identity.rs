use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use keystone_core::{TenantDescriptor, TenantId, TenantSlug, UserId};

use crate::{AuthError, Claims, Role, TokenDecoder};

/// A verified identity, valid for one request evaluation.
///
/// Only constructed from claims that passed signature and expiry checks and
/// carry a well-formed subject, tenant and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub tenant_id: TenantId,
    pub role: Role,
    pub tenant: Option<TenantDescriptor>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// Validate claim shape. Partial claims are never trusted.
    pub fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|e| AuthError::claims_incomplete(format!("sub: {e}")))?;
        let tenant_id = claims
            .tenant_id
            .parse::<TenantId>()
            .map_err(|e| AuthError::claims_incomplete(format!("tenantId: {e}")))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|e| AuthError::claims_incomplete(format!("role: {e}")))?;

        let tenant = match claims.tenant {
            None => None,
            Some(t) => {
                let id = t
                    .id
                    .parse::<TenantId>()
                    .map_err(|e| AuthError::claims_incomplete(format!("tenant.id: {e}")))?;
                if id != tenant_id {
                    return Err(AuthError::TenantMismatch);
                }
                // The descriptor is display data; a bad slug drops it, not the identity.
                match t.slug.parse::<TenantSlug>() {
                    Ok(slug) => Some(TenantDescriptor { id, name: t.name, slug }),
                    Err(e) => {
                        tracing::debug!(tenant_id = %id, "ignoring tenant descriptor: {e}");
                        None
                    }
                }
            }
        };

        Ok(Self {
            user_id,
            email: claims.email,
            tenant_id,
            role,
            tenant,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    /// Tenant isolation check for tenant-scoped resources.
    pub fn ensure_tenant(&self, tenant_id: TenantId) -> Result<(), AuthError> {
        if self.tenant_id == tenant_id {
            Ok(())
        } else {
            Err(AuthError::TenantMismatch)
        }
    }
}

/// Raw credential → `Identity`, or nothing.
#[derive(Clone)]
pub struct IdentityResolver {
    decoder: Arc<dyn TokenDecoder>,
}

impl IdentityResolver {
    pub fn new(decoder: Arc<dyn TokenDecoder>) -> Self {
        Self { decoder }
    }

    /// Absence of an identity is the only signal callers get; the reason is
    /// logged at debug level.
    pub fn resolve(&self, raw: Option<&str>, now: DateTime<Utc>) -> Option<Identity> {
        match self.try_resolve(raw, now) {
            Ok(identity) => Some(identity),
            Err(e) => {
                if e != AuthError::TokenAbsent {
                    tracing::debug!(reason = e.code(), "credential rejected: {e}");
                }
                None
            }
        }
    }

    /// Like [`resolve`](Self::resolve) but keeps the failure reason.
    pub fn try_resolve(
        &self,
        raw: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let raw = raw
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::TokenAbsent)?;
        let claims = self.decoder.decode(raw, now)?;
        Identity::from_claims(claims)
    }
}

impl core::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}
