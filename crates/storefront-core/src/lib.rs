//! # storefront-core
//!
//! Core crate for the storefront client SDK. Contains configuration
//! schemas, typed identifiers, pagination/sorting types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other storefront crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
