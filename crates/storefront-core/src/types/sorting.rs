//! Sort orders accepted by the product search endpoint.

use serde::{Deserialize, Serialize};

/// Sort order for product listings, rendered as the `sortBy` query
/// parameter. The variants mirror the values the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Best rated first.
    RatingDesc,
    /// Most recently added first.
    NewestFirst,
    /// Alphabetical by name.
    NameAsc,
    /// Reverse alphabetical by name.
    NameDesc,
}

impl ProductSort {
    /// Return the query parameter value for this sort order.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::RatingDesc => "rating_desc",
            Self::NewestFirst => "newest_first",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
        }
    }
}

impl std::fmt::Display for ProductSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_param())
    }
}
