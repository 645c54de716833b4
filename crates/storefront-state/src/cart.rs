//! Cart store: local lines mirrored to persistent storage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;

use storefront_core::AppResult;
use storefront_core::config::store::LocalStoreConfig;
use storefront_core::types::ProductId;
use storefront_entity::product::Product;

use crate::store::LocalStore;

/// One cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The product in the cart.
    pub product: Product,
    /// Units of the product.
    pub quantity: i64,
}

/// In-memory cart mirrored to the local store under the well-known key on
/// every mutation, rehydrated on construction.
///
/// Mutation is synchronous: handlers run to completion, so there is no
/// concurrency protocol beyond the single writer path.
pub struct CartStore {
    /// Local persistence.
    store: Arc<dyn LocalStore>,
    /// Key the cart is persisted under.
    key: String,
    /// Published cart lines.
    items_tx: watch::Sender<Vec<CartItem>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.items_tx.borrow().len())
            .finish()
    }
}

impl CartStore {
    /// Open the cart, rehydrating persisted contents. Unreadable persisted
    /// state starts an empty cart rather than failing startup.
    pub fn open(store: Arc<dyn LocalStore>, config: &LocalStoreConfig) -> AppResult<Self> {
        let items = match store.get(&config.cart_key)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable cart state: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        Ok(Self {
            store,
            key: config.cart_key.clone(),
            items_tx: watch::channel(items).0,
        })
    }

    /// Observe the cart lines.
    pub fn items(&self) -> watch::Receiver<Vec<CartItem>> {
        self.items_tx.subscribe()
    }

    /// Add one unit of a product: increments an existing line or appends
    /// a new one.
    pub fn add(&self, product: &Product) -> AppResult<()> {
        self.items_tx.send_modify(|items| {
            match items.iter_mut().find(|item| item.product.id == product.id) {
                Some(line) => line.quantity += 1,
                None => items.push(CartItem {
                    product: product.clone(),
                    quantity: 1,
                }),
            }
        });
        self.persist()
    }

    /// Remove one unit of a product; the line disappears at zero.
    pub fn decrease(&self, product_id: ProductId) -> AppResult<()> {
        self.items_tx.send_modify(|items| {
            if let Some(line) = items.iter_mut().find(|item| item.product.id == product_id) {
                line.quantity -= 1;
            }
            items.retain(|item| item.quantity > 0);
        });
        self.persist()
    }

    /// Drop a line entirely.
    pub fn remove(&self, product_id: ProductId) -> AppResult<()> {
        self.items_tx
            .send_modify(|items| items.retain(|item| item.product.id != product_id));
        self.persist()
    }

    /// Empty the cart.
    pub fn clear(&self) -> AppResult<()> {
        self.items_tx.send_modify(|items| items.clear());
        self.persist()
    }

    /// Units of the given product currently in the cart.
    pub fn quantity_of(&self, product_id: ProductId) -> i64 {
        self.items_tx
            .borrow()
            .iter()
            .find(|item| item.product.id == product_id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    /// Cart total: discounted unit price times quantity, summed.
    pub fn total(&self) -> f64 {
        self.items_tx
            .borrow()
            .iter()
            .map(|item| item.product.discounted_price() * item.quantity as f64)
            .sum()
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items_tx.borrow().iter().map(|item| item.quantity).sum()
    }

    /// Mirror the current lines to the local store.
    fn persist(&self) -> AppResult<()> {
        let raw = serde_json::to_string(&*self.items_tx.borrow())?;
        self.store.put(&self.key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::store::MemoryStore;

    fn product(id: i64, price: f64, discount_percent: f64) -> Product {
        Product {
            id: ProductId::from_i64(id),
            name: format!("product {id}"),
            description: String::new(),
            price,
            discount_percent,
            discount_price: price * (1.0 - discount_percent / 100.0),
            stock: 10,
            image_url: String::new(),
            brand: "Apex".to_string(),
            ratings: 4.2,
            review_count: Some(12),
            category_name: "gadgets".to_string(),
            created_at: Utc::now(),
        }
    }

    fn open_cart(store: Arc<MemoryStore>) -> CartStore {
        CartStore::open(store, &LocalStoreConfig::default()).unwrap()
    }

    #[test]
    fn test_add_same_product_merges_lines() {
        let cart = open_cart(Arc::new(MemoryStore::new()));
        let widget = product(1, 100.0, 0.0);

        cart.add(&widget).unwrap();
        cart.add(&widget).unwrap();

        let items = cart.items().borrow().clone();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(cart.quantity_of(widget.id), 2);
    }

    #[test]
    fn test_decrease_to_zero_removes_line() {
        let cart = open_cart(Arc::new(MemoryStore::new()));
        let widget = product(1, 100.0, 0.0);

        cart.add(&widget).unwrap();
        cart.decrease(widget.id).unwrap();

        assert!(cart.items().borrow().is_empty());
        assert_eq!(cart.quantity_of(widget.id), 0);
    }

    #[test]
    fn test_total_uses_discounted_price() {
        let cart = open_cart(Arc::new(MemoryStore::new()));
        let discounted = product(1, 100.0, 20.0);
        let plain = product(2, 10.0, 0.0);

        cart.add(&discounted).unwrap();
        cart.add(&discounted).unwrap();
        cart.add(&plain).unwrap();

        // 2 x 100 x 0.8 + 1 x 10 = 170
        assert!((cart.total() - 170.0).abs() < 1e-9);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_persists_and_rehydrates() {
        let store = Arc::new(MemoryStore::new());
        {
            let cart = open_cart(store.clone());
            cart.add(&product(1, 50.0, 0.0)).unwrap();
            cart.add(&product(2, 25.0, 0.0)).unwrap();
        }

        let reopened = open_cart(store);
        assert_eq!(reopened.items().borrow().len(), 2);
        assert!((reopened.total() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_clear_empties_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let cart = open_cart(store.clone());
        cart.add(&product(1, 50.0, 0.0)).unwrap();

        cart.clear().unwrap();

        assert!(cart.items().borrow().is_empty());
        assert_eq!(store.get("cart").unwrap(), Some("[]".to_string()));
    }
}
