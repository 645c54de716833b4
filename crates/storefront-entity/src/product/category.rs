//! Product category entity.

use serde::{Deserialize, Serialize};

use storefront_core::types::CategoryId;

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Category display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}
