//! User entity model.

use serde::{Deserialize, Serialize};

use storefront_core::types::UserId;

use super::role::UserRole;

/// A user account as returned by the user and admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Assigned role.
    pub role: UserRole,
    /// Whether an administrator has blocked the account.
    #[serde(default)]
    pub blocked: bool,
}
