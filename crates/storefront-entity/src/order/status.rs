//! Order status enumeration and progress projection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use storefront_core::AppError;

/// Lifecycle status of an order. The lifecycle is server-owned; the client
/// only projects it onto the order tracking wizard.
///
/// Wire values are the backend's historical names: the first two states
/// serialize as `PLACED` and `PACKED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order received, awaiting confirmation.
    #[serde(rename = "PLACED")]
    Pending,
    /// Order confirmed and being prepared.
    #[serde(rename = "PACKED")]
    Processing,
    /// Order handed to the carrier.
    #[serde(rename = "SHIPPED")]
    Shipped,
    /// Order delivered. Not terminal: delivery opens the 7-day return
    /// window, so the order stays active for tracking purposes.
    #[serde(rename = "DELIVERED")]
    Delivered,
    /// Order cancelled before delivery.
    #[serde(rename = "CANCELLED")]
    Cancelled,
    /// Customer requested a return.
    #[serde(rename = "RETURN_REQUESTED")]
    ReturnRequested,
    /// Return completed.
    #[serde(rename = "RETURNED")]
    Returned,
}

impl OrderStatus {
    /// Project this status onto the four-step tracking wizard.
    ///
    /// Steps 1-4 follow the normal fulfilment path; every end-of-life
    /// status collapses onto step 5.
    pub fn progress_step(&self) -> u8 {
        match self {
            Self::Pending => 1,
            Self::Processing => 2,
            Self::Shipped => 3,
            Self::Delivered => 4,
            Self::Cancelled | Self::ReturnRequested | Self::Returned => 5,
        }
    }

    /// Whether no further status transition is expected.
    ///
    /// `Delivered` is deliberately excluded: a delivered order can still
    /// move to `ReturnRequested` within the return window.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::ReturnRequested | Self::Returned)
    }

    /// Return the wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PLACED",
            Self::Processing => "PACKED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::ReturnRequested => "RETURN_REQUESTED",
            Self::Returned => "RETURNED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLACED" => Ok(Self::Pending),
            "PACKED" => Ok(Self::Processing),
            "SHIPPED" => Ok(Self::Shipped),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            "RETURN_REQUESTED" => Ok(Self::ReturnRequested),
            "RETURNED" => Ok(Self::Returned),
            _ => Err(AppError::validation(format!("Unknown order status: '{s}'"))),
        }
    }
}
