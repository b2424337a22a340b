//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac`] -- Role-gated wrappers around [`auth::AuthUser`].

pub mod auth;
pub mod rbac;
