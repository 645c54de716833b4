//! # storefront-state
//!
//! Client-owned mutable state. Every store follows the same shape: the
//! state lives inside a `tokio::sync::watch` sender owned by the store,
//! mutations go through named entry points only, and consumers observe
//! published snapshots through `watch` receivers. There is exactly one
//! writer path per piece of state.

pub mod cart;
pub mod notifications;
pub mod orders;
pub mod session;
pub mod store;

pub use cart::{CartItem, CartStore};
pub use notifications::NotificationCenter;
pub use orders::{OrderTracker, OrderView};
pub use session::{AuthState, SessionStore};
pub use store::{FileStore, LocalStore, MemoryStore};
