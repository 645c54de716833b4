//! Saved delivery address endpoints.

use validator::Validate;

use storefront_core::{AppError, AppResult};
use storefront_core::types::{AddressId, UserId};
use storefront_entity::address::{Address, AddressForm};

use crate::http::HttpClient;

/// Base path of the user resource the addresses hang off.
const BASE: &str = "/api/v1/users";

/// Typed client for the address endpoints.
#[derive(Debug, Clone)]
pub struct AddressesClient {
    /// Shared HTTP plumbing.
    http: HttpClient,
}

impl AddressesClient {
    /// Create a new addresses client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List the user's saved addresses.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<Address>> {
        self.http
            .get_json(&format!("{BASE}/{user_id}/addresses"), &[])
            .await
    }

    /// Save a new address.
    pub async fn add(&self, user_id: UserId, form: &AddressForm) -> AppResult<Address> {
        form.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.http
            .post_json(&format!("{BASE}/{user_id}/addresses"), form)
            .await
    }

    /// Update a saved address.
    pub async fn update(
        &self,
        user_id: UserId,
        address_id: AddressId,
        form: &AddressForm,
    ) -> AppResult<Address> {
        form.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.http
            .put_json(&format!("{BASE}/{user_id}/addresses/{address_id}"), form)
            .await
    }

    /// Delete a saved address.
    pub async fn delete(&self, user_id: UserId, address_id: AddressId) -> AppResult<()> {
        self.http
            .delete(&format!("{BASE}/{user_id}/addresses/{address_id}"))
            .await
    }
}
