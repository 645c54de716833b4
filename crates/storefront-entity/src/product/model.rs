//! Product entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::types::ProductId;

/// A product as returned by the catalog endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// List price before any discount.
    pub price: f64,
    /// Discount as a percentage of the list price.
    pub discount_percent: f64,
    /// Server-computed price after discount.
    pub discount_price: f64,
    /// Units in stock.
    pub stock: i64,
    /// Product image URL.
    pub image_url: String,
    /// Brand name.
    pub brand: String,
    /// Average rating.
    pub ratings: f64,
    /// Number of reviews behind the rating.
    pub review_count: Option<i64>,
    /// Name of the category this product belongs to.
    pub category_name: String,
    /// When the product was added to the catalog.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Unit price after applying the discount percentage.
    pub fn discounted_price(&self) -> f64 {
        self.price * (1.0 - self.discount_percent / 100.0)
    }

    /// Whether any units are available.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
