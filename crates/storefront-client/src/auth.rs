//! Authentication endpoints.

use validator::Validate;

use storefront_core::{AppError, AppResult};
use storefront_entity::auth::{
    LoginRequest, OtpRequest, OtpVerifyRequest, RefreshRequest, RegisterRequest, TokenResponse,
};
use storefront_entity::user::User;

use crate::http::HttpClient;

/// Base path of the auth endpoints.
const BASE: &str = "/api/auth";

/// Typed client for the auth endpoints.
///
/// Login, refresh, and the OTP flow go out anonymously: attaching a stale
/// bearer token to them would only invite spurious 401 handling.
#[derive(Debug, Clone)]
pub struct AuthClient {
    /// Shared HTTP plumbing.
    http: HttpClient,
}

impl AuthClient {
    /// Create a new auth client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Register a new account. The backend responds with an OTP challenge.
    pub async fn register(&self, form: &RegisterRequest) -> AppResult<serde_json::Value> {
        form.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.http
            .post_json_anonymous(&format!("{BASE}/register"), form)
            .await
    }

    /// Exchange credentials for a token pair.
    pub async fn login(&self, form: &LoginRequest) -> AppResult<TokenResponse> {
        form.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.http
            .post_json_anonymous(&format!("{BASE}/login"), form)
            .await
    }

    /// Exchange a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.http
            .post_json_anonymous(&format!("{BASE}/refresh"), &body)
            .await
    }

    /// Request an OTP code for the given email.
    pub async fn generate_otp(&self, email: &str) -> AppResult<serde_json::Value> {
        let body = OtpRequest {
            email: email.to_string(),
        };
        body.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.http
            .post_json_anonymous(&format!("{BASE}/generate-otp"), &body)
            .await
    }

    /// Verify an OTP code.
    pub async fn verify_otp(&self, form: &OtpVerifyRequest) -> AppResult<serde_json::Value> {
        form.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.http
            .post_json_anonymous(&format!("{BASE}/verify-otp"), form)
            .await
    }

    /// Fetch the authenticated principal's account.
    pub async fn me(&self) -> AppResult<User> {
        self.http.get_json(&format!("{BASE}/me"), &[]).await
    }
}
