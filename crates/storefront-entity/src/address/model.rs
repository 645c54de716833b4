//! Delivery address entity and form DTO.

use serde::{Deserialize, Serialize};
use validator::Validate;

use storefront_core::types::AddressId;

/// A saved delivery address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Unique address identifier.
    pub id: AddressId,
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
    /// Address type label, e.g. `HOME` or `WORK`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Outbound form for creating or updating an address.
///
/// Validated client-side before submission; an invalid form never reaches
/// the remote boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    /// Street line.
    #[validate(length(min = 1))]
    pub street: String,
    /// City.
    #[validate(length(min = 1))]
    pub city: String,
    /// State or region.
    #[validate(length(min = 1))]
    pub state: String,
    /// Postal code.
    #[validate(length(min = 1))]
    pub zip_code: String,
    /// Address type label.
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_street_rejected() {
        let form = AddressForm {
            street: String::new(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
            kind: "HOME".to_string(),
        };
        assert!(form.validate().is_err());
    }
}
