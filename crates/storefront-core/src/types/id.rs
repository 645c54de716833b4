//! Newtype wrappers around the backend's numeric keys for all domain
//! entity identifiers.
//!
//! Using distinct types prevents accidentally passing a `ProductId` where
//! an `OrderId` is expected. The backend mints every identifier; the client
//! never generates one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around `i64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Create an identifier from a raw numeric key.
            pub fn from_i64(value: i64) -> Self {
                Self(value)
            }

            /// Return the inner numeric value.
            pub fn into_i64(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a product.
    ProductId
}

define_id! {
    /// Identifier of a product category.
    CategoryId
}

define_id! {
    /// Identifier of an order.
    OrderId
}

define_id! {
    /// Identifier of a notification.
    NotificationId
}

define_id! {
    /// Identifier of a user account.
    UserId
}

define_id! {
    /// Identifier of a saved delivery address.
    AddressId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let id = OrderId::from_i64(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<OrderId>().unwrap(), id);
        assert!("not-a-number".parse::<OrderId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(id, ProductId::from_i64(7));
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
