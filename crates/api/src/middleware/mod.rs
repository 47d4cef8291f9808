//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`client_ip::ClientIp`] -- Best-effort client address from proxy headers.

pub mod auth;
pub mod client_ip;
pub mod rbac;
