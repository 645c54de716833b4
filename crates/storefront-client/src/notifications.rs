//! Notification endpoints.

use async_trait::async_trait;

use storefront_core::AppResult;
use storefront_core::types::NotificationId;
use storefront_entity::notification::{Audience, Notification};

use crate::http::HttpClient;

/// Base path of the notification endpoints.
const BASE: &str = "/api/v1/notifications";

/// Remote notification operations consumed by the notification center.
///
/// Split into a trait so the state layer can be exercised against an
/// in-memory fake.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Fetch the full notification backlog for the given audience.
    async fn fetch(&self, audience: Audience) -> AppResult<Vec<Notification>>;

    /// Mark one notification as read.
    async fn mark_read(&self, id: NotificationId) -> AppResult<()>;

    /// Mark every notification of the principal as read.
    async fn mark_all_read(&self) -> AppResult<()>;
}

/// Typed client for the notification endpoints.
#[derive(Debug, Clone)]
pub struct NotificationsClient {
    /// Shared HTTP plumbing.
    http: HttpClient,
}

impl NotificationsClient {
    /// Create a new notifications client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Fetch the principal's personal feed.
    pub async fn my(&self) -> AppResult<Vec<Notification>> {
        self.http.get_json(&format!("{BASE}/me"), &[]).await
    }

    /// Fetch the operator feed.
    pub async fn admin(&self) -> AppResult<Vec<Notification>> {
        self.http.get_json(&format!("{BASE}/admin"), &[]).await
    }

    /// Server-reported count of unread notifications.
    pub async fn unread_count(&self) -> AppResult<u64> {
        self.http.get_json(&format!("{BASE}/me/unread-count"), &[]).await
    }

    /// Mark one notification as read.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        self.http
            .post_empty(&format!("{BASE}/{id}/read"), &serde_json::json!({}))
            .await
    }

    /// Mark every notification of the principal as read.
    pub async fn mark_all_read(&self) -> AppResult<()> {
        self.http
            .post_empty(&format!("{BASE}/me/read-all"), &serde_json::json!({}))
            .await
    }
}

#[async_trait]
impl NotificationApi for NotificationsClient {
    async fn fetch(&self, audience: Audience) -> AppResult<Vec<Notification>> {
        match audience {
            Audience::User => self.my().await,
            Audience::Admin => self.admin().await,
        }
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        NotificationsClient::mark_read(self, id).await
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        NotificationsClient::mark_all_read(self).await
    }
}
