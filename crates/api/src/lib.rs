//! HTTP surface: guard middleware, identity propagation, server-side checks.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
