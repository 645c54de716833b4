//! JWT claims the client reads out of its own access token.
//!
//! The client never verifies the signature; the server is the verifier.
//! Only the fields the UI needs are extracted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::types::UserId;

use crate::user::UserRole;

/// Claims payload of a storefront access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, usually the user's email.
    #[serde(default)]
    pub sub: Option<String>,
    /// Numeric user identifier.
    #[serde(default, rename = "userId")]
    pub user_id: Option<UserId>,
    /// Role at token issuance.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: Option<i64>,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_check() {
        let now = Utc::now();
        let live = Claims {
            sub: None,
            user_id: None,
            role: None,
            exp: now.timestamp() + 60,
            iat: None,
        };
        let stale = Claims {
            exp: now.timestamp() - 60,
            ..live.clone()
        };
        assert!(!live.is_expired_at(now));
        assert!(stale.is_expired_at(now));
    }
}
