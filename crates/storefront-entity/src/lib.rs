//! # storefront-entity
//!
//! Domain entity models for the storefront client: products, orders and
//! their status lifecycle, notifications and push payloads, users,
//! addresses, and auth tokens. All wire types deserialize from the
//! backend's camelCase DTOs.

pub mod address;
pub mod auth;
pub mod notification;
pub mod order;
pub mod product;
pub mod user;
