//! Local key-value mirror configuration.

use serde::{Deserialize, Serialize};

/// Settings for the local persistent key-value store.
///
/// The store mirrors the browser's local storage: cart contents and auth
/// tokens are kept under well-known keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStoreConfig {
    /// Path of the JSON file backing the store.
    #[serde(default = "default_path")]
    pub path: String,
    /// Key under which cart contents are persisted.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
    /// Key under which the access token is persisted.
    #[serde(default = "default_access_token_key")]
    pub access_token_key: String,
    /// Key under which the refresh token is persisted.
    #[serde(default = "default_refresh_token_key")]
    pub refresh_token_key: String,
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            cart_key: default_cart_key(),
            access_token_key: default_access_token_key(),
            refresh_token_key: default_refresh_token_key(),
        }
    }
}

fn default_path() -> String {
    "data/storefront.json".to_string()
}

fn default_cart_key() -> String {
    "cart".to_string()
}

fn default_access_token_key() -> String {
    "authToken".to_string()
}

fn default_refresh_token_key() -> String {
    "refreshToken".to_string()
}
