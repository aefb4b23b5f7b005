//! Role name constants.
//!
//! These match the seeded rows in the `roles` table. Role checks in the
//! API layer compare against these constants rather than string literals.

/// Full control, including admin user management.
pub const ROLE_SUPERADMIN: &str = "superadmin";

/// Hospital-wide administration: all tickets, units, reports, rules.
pub const ROLE_ADMIN: &str = "admin";

/// Unit staff: scoped to the tickets and surveys of their own unit.
pub const ROLE_STAFF: &str = "staff";

/// Whether `name` is one of the seeded role names.
pub fn is_valid_role(name: &str) -> bool {
    matches!(name, ROLE_SUPERADMIN | ROLE_ADMIN | ROLE_STAFF)
}
