//! Token value types.

use serde::{Deserialize, Serialize};

/// The access/refresh token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Short-lived bearer token attached to API requests.
    pub access_token: String,
    /// Long-lived token exchanged for a new pair on expiry.
    pub refresh_token: String,
}
