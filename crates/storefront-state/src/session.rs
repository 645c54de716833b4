//! Session and token holder.
//!
//! Persists the access/refresh token pair under the well-known local
//! keys, decodes the access token's claims for the UI (role, user id),
//! and publishes the authentication state. Also implements the
//! [`TokenSource`] hook the HTTP layer uses for the single transparent
//! refresh-and-retry: a failed refresh, or a credential still rejected
//! after one, logs the principal out.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tokio::sync::watch;
use tracing::{debug, warn};

use storefront_client::AuthClient;
use storefront_client::http::TokenSource;
use storefront_core::config::store::LocalStoreConfig;
use storefront_core::types::UserId;
use storefront_core::{AppError, AppResult};
use storefront_entity::auth::{Claims, TokenResponse};
use storefront_entity::user::UserRole;

use crate::store::LocalStore;

/// Published authentication snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Whether a live access token is held.
    pub logged_in: bool,
    /// Role claimed by the access token.
    pub role: Option<UserRole>,
}

/// Holds the principal's tokens and authentication state.
pub struct SessionStore {
    /// Local persistence for the token pair.
    store: Arc<dyn LocalStore>,
    /// Anonymous auth client used for the refresh exchange.
    auth: AuthClient,
    /// Key of the access token entry.
    access_key: String,
    /// Key of the refresh token entry.
    refresh_key: String,
    /// Published authentication state.
    state_tx: watch::Sender<AuthState>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state_tx.borrow())
            .finish()
    }
}

impl SessionStore {
    /// Create a session store, rehydrating any persisted token.
    pub fn new(
        store: Arc<dyn LocalStore>,
        auth: AuthClient,
        config: &LocalStoreConfig,
    ) -> AppResult<Self> {
        let session = Self {
            store,
            auth,
            access_key: config.access_token_key.clone(),
            refresh_key: config.refresh_token_key.clone(),
            state_tx: watch::channel(AuthState::default()).0,
        };
        session.publish_state();
        Ok(session)
    }

    /// Observe the authentication state.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    /// Whether a live access token is held.
    pub fn is_logged_in(&self) -> bool {
        self.state_tx.borrow().logged_in
    }

    /// Role claimed by the current access token.
    pub fn role(&self) -> Option<UserRole> {
        self.state_tx.borrow().role
    }

    /// User id claimed by the current access token.
    pub fn user_id(&self) -> Option<UserId> {
        let token = self.current_access_token()?;
        decode_claims(&token).ok().and_then(|claims| claims.user_id)
    }

    /// Store a fresh token pair after login.
    pub fn login(&self, tokens: &TokenResponse) -> AppResult<()> {
        self.store.put(&self.access_key, &tokens.access_token)?;
        self.store.put(&self.refresh_key, &tokens.refresh_token)?;
        self.publish_state();
        Ok(())
    }

    /// Store the token pair produced by a refresh exchange.
    pub fn apply_refresh(&self, tokens: &TokenResponse) -> AppResult<()> {
        self.login(tokens)
    }

    /// Drop the access token and publish the logged-out state.
    ///
    /// The refresh token entry is left in place, matching the behavior of
    /// the deployed client.
    pub fn logout(&self) {
        if let Err(e) = self.store.remove(&self.access_key) {
            warn!("Failed to clear access token: {}", e);
        }
        self.publish_state();
    }

    /// Current access token, dropping it if it has expired.
    fn current_access_token(&self) -> Option<String> {
        let token = self.store.get(&self.access_key).ok().flatten()?;
        match decode_claims(&token) {
            Ok(claims) if claims.is_expired() => {
                debug!("Access token expired, logging out");
                self.logout();
                None
            }
            Ok(_) => Some(token),
            Err(e) => {
                warn!("Discarding undecodable access token: {}", e);
                self.logout();
                None
            }
        }
    }

    /// Recompute and publish the authentication state from storage.
    fn publish_state(&self) {
        let state = match self.store.get(&self.access_key).ok().flatten() {
            Some(token) => match decode_claims(&token) {
                Ok(claims) if !claims.is_expired() => AuthState {
                    logged_in: true,
                    role: claims.role,
                },
                _ => AuthState::default(),
            },
            None => AuthState::default(),
        };
        self.state_tx.send_replace(state);
    }
}

#[async_trait]
impl TokenSource for SessionStore {
    fn access_token(&self) -> Option<String> {
        self.current_access_token()
    }

    async fn refresh(&self) -> AppResult<String> {
        let Some(refresh_token) = self.store.get(&self.refresh_key).ok().flatten() else {
            self.logout();
            return Err(AppError::authentication("No refresh token held"));
        };

        match self.auth.refresh(&refresh_token).await {
            Ok(tokens) => {
                self.apply_refresh(&tokens)?;
                Ok(tokens.access_token)
            }
            Err(e) => {
                // Second authorization failure: force logout.
                self.logout();
                Err(e)
            }
        }
    }

    fn force_logout(&self) {
        self.logout();
    }
}

/// Decode the claims of an access token without verifying the signature.
///
/// The client is not the verifier; it only reads the role, user id, and
/// expiry the server put there.
fn decode_claims(token: &str) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims = Default::default();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::authentication(format!("Cannot decode access token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use storefront_client::HttpClient;
    use storefront_core::config::api::ApiConfig;

    use crate::store::MemoryStore;

    fn make_token(exp_offset_seconds: i64, role: Option<UserRole>) -> String {
        let claims = Claims {
            sub: Some("buyer@example.com".to_string()),
            user_id: Some(UserId::from_i64(7)),
            role,
            exp: Utc::now().timestamp() + exp_offset_seconds,
            iat: Some(Utc::now().timestamp()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    fn make_session(store: Arc<dyn LocalStore>) -> SessionStore {
        let http = HttpClient::new(&ApiConfig::default()).unwrap();
        SessionStore::new(store, AuthClient::new(http), &LocalStoreConfig::default()).unwrap()
    }

    #[test]
    fn test_login_publishes_state() {
        let session = make_session(Arc::new(MemoryStore::new()));
        assert!(!session.is_logged_in());

        session
            .login(&TokenResponse {
                access_token: make_token(3600, Some(UserRole::Admin)),
                refresh_token: "refresh".to_string(),
            })
            .unwrap();

        assert!(session.is_logged_in());
        assert_eq!(session.role(), Some(UserRole::Admin));
        assert_eq!(session.user_id(), Some(UserId::from_i64(7)));
    }

    #[test]
    fn test_expired_token_dropped_on_read() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("authToken", &make_token(-60, Some(UserRole::User)))
            .unwrap();

        let session = make_session(store.clone());
        assert!(!session.is_logged_in());
        assert_eq!(session.access_token(), None);
        // The stale entry is gone after the read.
        assert_eq!(store.get("authToken").unwrap(), None);
    }

    #[test]
    fn test_logout_keeps_refresh_token() {
        let store = Arc::new(MemoryStore::new());
        let session = make_session(store.clone());
        session
            .login(&TokenResponse {
                access_token: make_token(3600, Some(UserRole::User)),
                refresh_token: "refresh".to_string(),
            })
            .unwrap();

        session.logout();
        assert!(!session.is_logged_in());
        assert_eq!(store.get("authToken").unwrap(), None);
        assert_eq!(store.get("refreshToken").unwrap(), Some("refresh".to_string()));
    }
}
