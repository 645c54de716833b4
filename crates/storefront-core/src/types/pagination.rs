//! Pagination types for paginated list endpoints.
//!
//! The backend exposes Spring-style pages: requests carry a 0-based `page`
//! and a `size`, responses wrap the items in a `content` array alongside
//! the page bookkeeping fields.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_PAGE_SIZE: u64 = 10;
/// Maximum page size the client will request.
const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (0-based).
    #[serde(default)]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub size: u64,
}

impl PageRequest {
    /// Create a new page request.
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Render the request as query parameter pairs.
    pub fn to_query(self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a paginated server response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub content: Vec<T>,
    /// Total number of pages.
    pub total_pages: u64,
    /// Total number of items across all pages.
    pub total_elements: u64,
    /// Number of items per page.
    pub size: u64,
    /// Current page number (0-based).
    pub number: u64,
}

impl<T> Page<T> {
    /// Whether a page follows this one.
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    /// Whether a page precedes this one.
    pub fn has_previous(&self) -> bool {
        self.number > 0
    }
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
