//! # storefront-client
//!
//! Typed REST clients for the storefront backend. One thin client per
//! resource family, all sharing the [`http::HttpClient`] plumbing that
//! attaches the bearer credential and performs the single transparent
//! refresh-and-retry on an expired token.

pub mod addresses;
pub mod admin;
pub mod auth;
pub mod http;
pub mod notifications;
pub mod orders;
pub mod products;

pub use addresses::AddressesClient;
pub use admin::{AdminClient, CategoryForm};
pub use auth::AuthClient;
pub use http::{HttpClient, TokenSource};
pub use notifications::{NotificationApi, NotificationsClient};
pub use orders::{NewOrder, NewOrderItem, OrdersClient};
pub use products::{ProductForm, ProductQuery, ProductsClient};
