//! Well-known role names carried in access-token claims.

pub const ROLE_ADMIN: &str = "admin";

/// Whether the given role name grants admin capabilities.
///
/// The only place role names are compared; handlers go through
/// `AuthUser::is_admin` which delegates here.
pub fn is_admin_role(role: &str) -> bool {
    role == ROLE_ADMIN
}
