//! `keystone-core` — shared identifiers and tenant primitives.
//!
//! Nothing in here knows about tokens, roles or HTTP.

pub mod error;
pub mod id;
pub mod tenant;

pub use error::{DomainError, DomainResult};
pub use id::{TenantId, UserId};
pub use tenant::{TenantDescriptor, TenantSlug};
