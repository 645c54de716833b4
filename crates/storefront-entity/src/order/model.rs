//! Order entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::types::{OrderId, ProductId};

use crate::user::User;

use super::status::OrderStatus;

/// Length of the return window after delivery, in whole days.
const RETURN_WINDOW_DAYS: i64 = 7;

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The ordered product.
    pub product_id: ProductId,
    /// Product name at order time.
    pub product_name: String,
    /// Units ordered.
    pub quantity: i64,
    /// Unit price charged.
    pub unit_price: f64,
    /// Product image URL, filled in lazily by the client.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One entry of an order's status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    /// The status the order entered.
    pub status: OrderStatus,
    /// When the transition happened.
    pub timestamp: DateTime<Utc>,
}

/// An order as returned by the order endpoints.
///
/// Owned entirely by the server; the client holds a read-mostly cached copy
/// refreshed on navigation and on any push notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// The ordering user, present on admin views.
    #[serde(default)]
    pub user: Option<User>,
    /// Email of the ordering user.
    pub user_email: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Total discount captured at checkout.
    pub savings: f64,
    /// Free-form shipping address.
    pub shipping_address: String,
    /// Amount charged.
    pub total_amount: f64,
    /// Amount before discounts.
    pub without_discount_amount: f64,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Ordered lines.
    pub items: Vec<OrderItem>,
    /// Ordered list of status transitions.
    pub status_history: Vec<StatusHistoryEntry>,
    /// Promised or actual delivery date.
    #[serde(default)]
    pub delivery_date: Option<DateTime<Utc>>,
}

impl Order {
    /// Timestamp of the first history entry for the given status, if any.
    pub fn status_timestamp(&self, status: OrderStatus) -> Option<DateTime<Utc>> {
        self.status_history
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.timestamp)
    }

    /// Whether the order can be returned at the given instant.
    ///
    /// True iff the order is currently `Delivered`, the history records the
    /// delivery, and no more than [`RETURN_WINDOW_DAYS`] whole calendar days
    /// (ceiling of the absolute elapsed time) have passed since. An order
    /// whose history lacks the delivery entry is not returnable.
    pub fn is_returnable_at(&self, now: DateTime<Utc>) -> bool {
        if self.status != OrderStatus::Delivered {
            return false;
        }
        let Some(delivered_at) = self.status_timestamp(OrderStatus::Delivered) else {
            return false;
        };
        let elapsed_ms = (now - delivered_at).num_milliseconds().abs() as u64;
        let elapsed_days = elapsed_ms.div_ceil(86_400_000);
        elapsed_days <= RETURN_WINDOW_DAYS as u64
    }

    /// Whether the order can be returned right now.
    pub fn is_returnable(&self) -> bool {
        self.is_returnable_at(Utc::now())
    }

    /// Sum of undiscounted line totals.
    pub fn original_total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.unit_price * item.quantity as f64)
            .sum()
    }

    /// Savings as a rounded percentage of the pre-discount amount.
    pub fn savings_percent(&self) -> u8 {
        let original = self.total_amount + self.savings;
        if original <= 0.0 || self.savings <= 0.0 {
            return 0;
        }
        ((self.savings / original) * 100.0).round() as u8
    }
}
