//! Live push payload delivered over the push channel.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::types::OrderId;

/// Event type used for frames that could not be parsed as JSON.
pub const RAW_KIND: &str = "RAW";

/// A server push as delivered on the notification destinations.
///
/// The payload is an open record: only `type` is guaranteed, everything
/// else depends on the event. Unknown fields are retained in `extra` so
/// callers can inspect event-specific data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    /// Event type, e.g. `ORDER_PLACED`, `ORDER_STATUS_CHANGED`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message, if the event carries one.
    #[serde(default)]
    pub message: Option<String>,
    /// Event timestamp, if the event carries one.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Order the event concerns, if any.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    /// New order status, if the event is a status change.
    #[serde(default)]
    pub status: Option<String>,
    /// Any remaining event-specific fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PushPayload {
    /// Wrap an unparseable frame body as a `RAW` payload so it is
    /// delivered rather than dropped.
    pub fn raw(body: impl Into<String>) -> Self {
        Self {
            kind: RAW_KIND.to_string(),
            message: Some(body.into()),
            timestamp: None,
            order_id: None,
            status: None,
            extra: BTreeMap::new(),
        }
    }
}
