//! Shared HTTP plumbing for the REST clients.
//!
//! Every request goes through [`HttpClient::send`], which attaches the
//! bearer credential from the configured [`TokenSource`] and implements
//! the credential-expiry contract: on a 401 response the original request
//! is retried exactly once after a transparent token refresh. A second
//! rejection, whether of the refresh exchange or of the retried request,
//! surfaces as an authentication error and ends the session. No other
//! automatic retries exist at this layer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use storefront_core::config::api::ApiConfig;
use storefront_core::{AppError, AppResult};

/// Supplies the bearer credential and the refresh hook.
///
/// Implemented by the session store; kept as a trait so this crate does
/// not depend on state management.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Current access token, if the principal is authenticated.
    fn access_token(&self) -> Option<String>;

    /// Exchange the refresh token for a new pair, returning the fresh
    /// access token. Called at most once per failed request.
    async fn refresh(&self) -> AppResult<String>;

    /// Discard the session after the retried request was rejected again.
    fn force_logout(&self);
}

/// Shared HTTP client for all resource clients.
#[derive(Clone)]
pub struct HttpClient {
    /// Underlying connection pool.
    http: Client,
    /// Backend base URL without a trailing slash.
    base_url: String,
    /// Credential source, absent for anonymous use.
    tokens: Option<Arc<dyn TokenSource>>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpClient {
    /// Create a new client from API configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens: None,
        })
    }

    /// Attach a credential source. Requests made afterwards carry the
    /// bearer token and participate in the refresh-and-retry path.
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Join a path onto the base URL.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self.send(Method::GET, path, query, None).await?;
        Self::read_json(response).await
    }

    /// GET an opaque binary resource.
    pub async fn get_bytes(&self, path: &str) -> AppResult<bytes::Bytes> {
        let response = self.send(Method::GET, path, &[], None).await?;
        response
            .bytes()
            .await
            .map_err(|e| AppError::with_source(
                storefront_core::error::ErrorKind::Transport,
                format!("Failed to read response body: {e}"),
                e,
            ))
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, path, &[], Some(&body)).await?;
        Self::read_json(response).await
    }

    /// POST a JSON body, ignoring the response body.
    pub async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> AppResult<()> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, &[], Some(&body)).await?;
        Ok(())
    }

    /// PUT a JSON body and decode a JSON response.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::PUT, path, &[], Some(&body)).await?;
        Self::read_json(response).await
    }

    /// PUT a JSON body, ignoring the response body.
    pub async fn put_empty<B: Serialize>(&self, path: &str, body: &B) -> AppResult<()> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, path, &[], Some(&body)).await?;
        Ok(())
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// POST without attaching a credential and without the retry path.
    ///
    /// Used by the auth endpoints themselves (login, refresh, OTP), which
    /// must not recurse into the refresh logic.
    pub async fn post_json_anonymous<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self
            .dispatch(&Method::POST, path, &[], Some(&body), None)
            .await?;
        let response = Self::check_status(response).await?;
        Self::read_json(response).await
    }

    /// Execute a request with the credential-expiry contract applied.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> AppResult<Response> {
        let bearer = self.tokens.as_ref().and_then(|t| t.access_token());
        let response = self.dispatch(&method, path, query, body, bearer).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(tokens) = &self.tokens {
                debug!("Received 401 for {} {}, refreshing credential", method, path);
                let fresh = tokens.refresh().await?;
                let retried = self
                    .dispatch(&method, path, query, body, Some(fresh))
                    .await?;
                return match Self::check_status(retried).await {
                    Err(e) if e.is_authentication() => {
                        // The freshly minted credential was rejected too.
                        tokens.force_logout();
                        Err(e)
                    }
                    checked => checked,
                };
            }
        }

        Self::check_status(response).await
    }

    /// Build and fire a single request attempt.
    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
        bearer: Option<String>,
    ) -> AppResult<Response> {
        let mut request = self.http.request(method.clone(), self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request.send().await.map_err(|e| {
            AppError::with_source(
                storefront_core::error::ErrorKind::Transport,
                format!("Request to {path} failed: {e}"),
                e,
            )
        })
    }

    /// Map a non-success status onto the error taxonomy.
    async fn check_status(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED => {
                AppError::authentication(format!("Credential rejected: {message}"))
            }
            StatusCode::FORBIDDEN => AppError::authorization(format!("Forbidden: {message}")),
            StatusCode::NOT_FOUND => AppError::not_found(format!("Not found: {message}")),
            StatusCode::CONFLICT => AppError::conflict(format!("Conflict: {message}")),
            s if s.is_client_error() => {
                AppError::validation(format!("Rejected by server ({status}): {message}"))
            }
            _ => AppError::transport(format!("Server error ({status}): {message}")),
        })
    }

    /// Decode a JSON response body.
    async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                storefront_core::error::ErrorKind::Serialization,
                format!("Failed to decode response body: {e}"),
                e,
            )
        })
    }
}
