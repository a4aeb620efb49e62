//! `keystone-auth` — token verification and role-based authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage: everything in
//! here is a pure function of (token, now, signing key, route table, catalog).

pub mod claims;
pub mod codec;
pub mod error;
pub mod gate;
pub mod guard;
pub mod identity;
pub mod permissions;
pub mod roles;
pub mod route;

pub use claims::{Claims, TenantClaim};
pub use codec::{Hs256Codec, TokenDecoder};
pub use error::AuthError;
pub use gate::{PermissionGate, can};
pub use guard::{Decision, IdentityContext, RouteGuard};
pub use identity::{Identity, IdentityResolver};
pub use permissions::{Action, Permission, PermissionCatalog, Resource};
pub use roles::Role;
pub use route::{RoleRequirement, RouteClass, RouteRule, RouteTable};
