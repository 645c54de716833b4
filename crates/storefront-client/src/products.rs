//! Product catalog endpoints and the search query view model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use storefront_core::AppResult;
use storefront_core::types::{Page, PageRequest, ProductId, ProductSort};
use storefront_entity::product::{Category, Product};

use crate::http::HttpClient;

/// Base path of the product endpoints.
const BASE: &str = "/api/products";
/// Path of the public category listing.
const CATEGORIES: &str = "/api/products/categories";

/// Multi-axis product search parameters.
///
/// Filtering, pagination, and sorting are all delegated to the server;
/// this type only maps the chosen axes onto query parameters. Unset axes
/// produce no parameter at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Page to request.
    pub page: PageRequest,
    /// Free-text search keyword.
    pub keyword: Option<String>,
    /// Category name filter.
    pub category: Option<String>,
    /// Brand filters; each selected brand is sent as a repeated parameter.
    pub brands: Vec<String>,
    /// Minimum average rating.
    pub min_rating: Option<f64>,
    /// Minimum discount percentage.
    pub min_discount: Option<f64>,
    /// Maximum discount percentage.
    pub max_discount: Option<f64>,
    /// Maximum discounted price.
    pub max_price: Option<f64>,
    /// Sort order.
    pub sort: Option<ProductSort>,
}

impl ProductQuery {
    /// Start from defaults: first page, no filters, server-default order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a page.
    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Filter by a free-text keyword.
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Filter by category name.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Add a brand filter.
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.push(brand.into());
        self
    }

    /// Require a minimum average rating.
    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    /// Bound the discount percentage from below.
    pub fn min_discount(mut self, discount: f64) -> Self {
        self.min_discount = Some(discount);
        self
    }

    /// Bound the discount percentage from above.
    pub fn max_discount(mut self, discount: f64) -> Self {
        self.max_discount = Some(discount);
        self
    }

    /// Bound the discounted price from above.
    pub fn max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }

    /// Select a sort order.
    pub fn sort(mut self, sort: ProductSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Render the chosen axes as query parameter pairs.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = self.page.to_query();
        if let Some(keyword) = &self.keyword {
            params.push(("keyword", keyword.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        for brand in &self.brands {
            params.push(("brands", brand.clone()));
        }
        if let Some(rating) = self.min_rating {
            params.push(("minRating", rating.to_string()));
        }
        if let Some(discount) = self.min_discount {
            params.push(("minDiscount", discount.to_string()));
        }
        if let Some(discount) = self.max_discount {
            params.push(("maxDiscount", discount.to_string()));
        }
        if let Some(price) = self.max_price {
            params.push(("maxPrice", price.to_string()));
        }
        if let Some(sort) = self.sort {
            params.push(("sortBy", sort.as_param().to_string()));
        }
        params
    }
}

/// Outbound form for creating or updating a product (back-office).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    /// Display name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// List price before any discount.
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Discount as a percentage of the list price.
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percent: f64,
    /// Units in stock.
    #[validate(range(min = 0))]
    pub stock: i64,
    /// Product image URL.
    pub image_url: String,
    /// Brand name.
    #[validate(length(min = 1))]
    pub brand: String,
    /// Name of the category this product belongs to.
    #[validate(length(min = 1))]
    pub category_name: String,
}

/// Typed client for the product catalog endpoints.
#[derive(Debug, Clone)]
pub struct ProductsClient {
    /// Shared HTTP plumbing.
    http: HttpClient,
}

impl ProductsClient {
    /// Create a new products client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Search the catalog with the given filter/paginate/sort axes.
    pub async fn search(&self, query: &ProductQuery) -> AppResult<Page<Product>> {
        self.http.get_json(BASE, &query.to_query()).await
    }

    /// Fetch one product by id.
    pub async fn get(&self, id: ProductId) -> AppResult<Product> {
        self.http.get_json(&format!("{BASE}/{id}"), &[]).await
    }

    /// Create a product (back-office).
    pub async fn create(&self, product: &ProductForm) -> AppResult<Product> {
        product
            .validate()
            .map_err(|e| storefront_core::AppError::validation(e.to_string()))?;
        self.http.post_json(BASE, product).await
    }

    /// Update a product (back-office).
    pub async fn update(&self, id: ProductId, product: &ProductForm) -> AppResult<Product> {
        product
            .validate()
            .map_err(|e| storefront_core::AppError::validation(e.to_string()))?;
        self.http.put_json(&format!("{BASE}/{id}"), product).await
    }

    /// Delete a product (back-office).
    pub async fn delete(&self, id: ProductId) -> AppResult<()> {
        self.http.delete(&format!("{BASE}/{id}")).await
    }

    /// List public categories.
    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        self.http.get_json(CATEGORIES, &[]).await
    }
}
