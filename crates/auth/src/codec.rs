//! Signed token encoding/decoding.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};

use crate::AuthError;
use crate::claims::{Claims, validate_claims};

/// Turns a raw token into verified claims.
///
/// Implementations must be pure over (token, now, key material).
pub trait TokenDecoder: Send + Sync {
    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError>;
}

/// HMAC-SHA256 codec over a shared secret configured at startup.
pub struct Hs256Codec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Codec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        // Time checks happen in `validate_claims` against the caller's `now`,
        // so the library's wall-clock checks are switched off.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign `claims`. Issuance policy lives outside this crate; this exists so
    /// issuers and tests share the exact wire format.
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }
}

impl TokenDecoder for Hs256Codec {
    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::TokenBadSignature
                }
                _ => AuthError::TokenMalformed,
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

impl core::fmt::Debug for Hs256Codec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Codec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use keystone_core::{TenantDescriptor, TenantId, UserId};

    use super::*;
    use crate::Role;

    fn tenant() -> TenantDescriptor {
        TenantDescriptor {
            id: TenantId::new(),
            name: "Acme Realty".to_string(),
            slug: "acme-realty".parse().unwrap(),
        }
    }

    fn fresh(now: DateTime<Utc>) -> Claims {
        Claims::issue(
            UserId::new(),
            "ana@acme.test",
            &tenant(),
            Role::Agent,
            now,
            Duration::minutes(10),
        )
    }

    #[test]
    fn round_trip_preserves_claims() {
        let codec = Hs256Codec::new("secret");
        let now = Utc::now();
        let claims = fresh(now);
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token, now).unwrap(), claims);
    }

    #[test]
    fn wrong_key_is_bad_signature() {
        let now = Utc::now();
        let token = Hs256Codec::new("issuer-secret").encode(&fresh(now)).unwrap();
        let err = Hs256Codec::new("other-secret").decode(&token, now).unwrap_err();
        assert_eq!(err, AuthError::TokenBadSignature);
    }

    #[test]
    fn tampered_payload_is_bad_signature() {
        let codec = Hs256Codec::new("secret");
        let now = Utc::now();
        let token = codec.encode(&fresh(now)).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let other = codec.encode(&fresh(now)).unwrap();
        let other_payload = other.split('.').nth(1).unwrap().to_string();
        parts[1] = &other_payload;
        let forged = parts.join(".");

        assert_eq!(codec.decode(&forged, now).unwrap_err(), AuthError::TokenBadSignature);
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = Hs256Codec::new("secret");
        for raw in ["", "abc", "a.b.c", "not a token at all"] {
            assert_eq!(
                codec.decode(raw, Utc::now()).unwrap_err(),
                AuthError::TokenMalformed,
                "{raw:?}"
            );
        }
    }

    #[test]
    fn expiry_boundary_is_rejected() {
        let codec = Hs256Codec::new("secret");
        let now = Utc::now();
        let claims = fresh(now);
        let token = codec.encode(&claims).unwrap();

        assert!(codec.decode(&token, claims.exp - Duration::seconds(1)).is_ok());
        assert_eq!(codec.decode(&token, claims.exp).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let now = Utc::now();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &fresh(now),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        let err = Hs256Codec::new("secret").decode(&token, now).unwrap_err();
        assert_eq!(err, AuthError::TokenBadSignature);
    }
}
