//! Order endpoints.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use storefront_core::AppResult;
use storefront_core::types::{OrderId, ProductId};
use storefront_entity::order::{Order, OrderStatus};

use crate::http::HttpClient;

/// Base path of the customer order endpoints.
const BASE: &str = "/api/orders";
/// Base path of the back-office order endpoints.
const ADMIN_BASE: &str = "/api/admin/orders";

/// One line of an order being placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    /// Product to order.
    pub product_id: ProductId,
    /// Units to order.
    pub quantity: i64,
}

/// Checkout request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Lines to order.
    pub items: Vec<NewOrderItem>,
    /// Free-form shipping address.
    pub shipping_address: String,
}

/// Body of the admin status-transition request.
#[derive(Debug, Clone, Serialize)]
struct StatusUpdate {
    /// The status to transition to.
    status: OrderStatus,
}

/// Typed client for the order endpoints.
#[derive(Debug, Clone)]
pub struct OrdersClient {
    /// Shared HTTP plumbing.
    http: HttpClient,
}

impl OrdersClient {
    /// Create a new orders client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Place a new order.
    pub async fn create(&self, order: &NewOrder) -> AppResult<Order> {
        self.http.post_json(BASE, order).await
    }

    /// Fetch one order by id.
    pub async fn get(&self, id: OrderId) -> AppResult<Order> {
        self.http.get_json(&format!("{BASE}/{id}"), &[]).await
    }

    /// List the principal's orders.
    pub async fn list(&self) -> AppResult<Vec<Order>> {
        self.http.get_json(BASE, &[]).await
    }

    /// List all orders (back-office).
    pub async fn list_all(&self) -> AppResult<Vec<Order>> {
        self.http.get_json(ADMIN_BASE, &[]).await
    }

    /// Transition an order's status (back-office).
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> AppResult<Order> {
        self.http
            .put_json(&format!("{ADMIN_BASE}/{id}/status"), &StatusUpdate { status })
            .await
    }

    /// Cancel the principal's order.
    pub async fn cancel(&self, id: OrderId) -> AppResult<()> {
        self.http.delete(&format!("{BASE}/{id}")).await
    }

    /// Cancel any order (back-office).
    pub async fn cancel_admin(&self, id: OrderId) -> AppResult<()> {
        self.http.delete(&format!("{ADMIN_BASE}/{id}")).await
    }

    /// Download the order invoice as opaque PDF bytes.
    pub async fn invoice(&self, id: OrderId) -> AppResult<Bytes> {
        self.http.get_bytes(&format!("{BASE}/{id}/invoice")).await
    }

    /// Request a return for a delivered order.
    pub async fn request_return(&self, id: OrderId) -> AppResult<Order> {
        self.http
            .put_json(&format!("{BASE}/{id}/return"), &serde_json::json!({}))
            .await
    }
}
