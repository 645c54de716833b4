//! Delivery address entities.

pub mod model;

pub use model::{Address, AddressForm};
