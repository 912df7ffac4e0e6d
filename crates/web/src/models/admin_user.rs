//! Admin user domain type.

use chrono::{DateTime, Utc};

use support_desk_core::AdminUserId;

/// An admin account (domain type).
///
/// Carries no password hash; the hash only leaves the repository through
/// `AdminUserRepository::get_with_password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login name.
    pub username: String,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
}
