//! Tenant descriptor carried alongside an identity.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::{DomainError, TenantId};

/// URL-safe tenant handle (`acme-realty`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantSlug(String);

impl TenantSlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TenantSlug {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DomainError::validation("tenant slug is empty"));
        }
        let valid = s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid || s.starts_with('-') || s.ends_with('-') {
            return Err(DomainError::validation(format!("invalid tenant slug '{s}'")));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for TenantSlug {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TenantSlug> for String {
    fn from(value: TenantSlug) -> Self {
        value.0
    }
}

impl core::fmt::Display for TenantSlug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display data for the tenant an identity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantDescriptor {
    pub id: TenantId,
    pub name: String,
    pub slug: TenantSlug,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_kebab_case() {
        let slug: TenantSlug = "acme-realty-2".parse().unwrap();
        assert_eq!(slug.as_str(), "acme-realty-2");
    }

    #[test]
    fn rejects_bad_slugs() {
        for bad in ["", "Acme", "acme realty", "-acme", "acme-", "acme/x"] {
            assert!(bad.parse::<TenantSlug>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn slug_validated_on_deserialize() {
        let ok: Result<TenantSlug, _> = serde_json::from_str("\"acme\"");
        assert!(ok.is_ok());
        let bad: Result<TenantSlug, _> = serde_json::from_str("\"ACME\"");
        assert!(bad.is_err());
    }
}
