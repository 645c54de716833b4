//! Back-office administration endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use storefront_core::{AppError, AppResult};
use storefront_core::types::{CategoryId, OrderId, UserId};
use storefront_entity::product::Category;
use storefront_entity::user::User;

use crate::http::HttpClient;

/// Base path of the admin user endpoints.
const USERS: &str = "/api/admin/users";
/// Base path of the admin category endpoints.
const CATEGORIES: &str = "/api/admin/categories";

/// Outbound form for creating or renaming a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryForm {
    /// Category display name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Typed client for the back-office endpoints.
#[derive(Debug, Clone)]
pub struct AdminClient {
    /// Shared HTTP plumbing.
    http: HttpClient,
}

impl AdminClient {
    /// Create a new admin client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List all user accounts.
    pub async fn users(&self) -> AppResult<Vec<User>> {
        self.http.get_json(USERS, &[]).await
    }

    /// Block a user account.
    pub async fn block_user(&self, id: UserId) -> AppResult<()> {
        self.http
            .put_empty(&format!("{USERS}/{id}/block"), &serde_json::json!({}))
            .await
    }

    /// Unblock a user account.
    pub async fn unblock_user(&self, id: UserId) -> AppResult<()> {
        self.http
            .put_empty(&format!("{USERS}/{id}/unblock"), &serde_json::json!({}))
            .await
    }

    /// Accept a pending return request.
    pub async fn accept_return(&self, id: OrderId) -> AppResult<()> {
        self.http
            .put_empty(&format!("{USERS}/{id}/accept-return"), &serde_json::json!({}))
            .await
    }

    /// Reject a pending return request.
    pub async fn reject_return(&self, id: OrderId) -> AppResult<()> {
        self.http
            .put_empty(&format!("{USERS}/{id}/reject-return"), &serde_json::json!({}))
            .await
    }

    /// List all categories, including unpublished ones.
    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        self.http.get_json(CATEGORIES, &[]).await
    }

    /// Create a category.
    pub async fn create_category(&self, form: &CategoryForm) -> AppResult<Category> {
        form.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.http.post_json(CATEGORIES, form).await
    }

    /// Rename or re-describe a category.
    pub async fn update_category(&self, id: CategoryId, form: &CategoryForm) -> AppResult<Category> {
        form.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.http.put_json(&format!("{CATEGORIES}/{id}"), form).await
    }

    /// Delete a category.
    pub async fn delete_category(&self, id: CategoryId) -> AppResult<()> {
        self.http.delete(&format!("{CATEGORIES}/{id}")).await
    }
}
