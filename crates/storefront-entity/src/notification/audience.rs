//! Notification audiences.

use serde::{Deserialize, Serialize};

/// Which notification feed a principal consumes.
///
/// Customers pull their personal feed and listen on the per-principal
/// destination; operators additionally consume the broadcast destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// The authenticated customer's personal feed.
    User,
    /// The operator (back-office) feed.
    Admin,
}

impl Audience {
    /// Whether this audience receives the operator broadcast destination.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}
