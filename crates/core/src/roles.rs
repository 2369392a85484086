//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Returns `true` if `role` grants access to admin-only operations.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
