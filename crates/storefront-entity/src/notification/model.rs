//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::types::NotificationId;

use super::payload::PushPayload;

/// A notification shown to the principal.
///
/// Entries fetched over REST carry the server-minted id. Entries
/// synthesized from a push payload carry no id until the next full reload
/// confirms them; such entries cannot be individually marked as read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Server-minted identifier, absent on push-synthesized entries.
    #[serde(default)]
    pub id: Option<NotificationId>,
    /// Event type, e.g. `ORDER_STATUS_CHANGED`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message body.
    pub message: String,
    /// Whether the principal has acknowledged this notification.
    pub is_read: bool,
    /// When the notification was produced.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Synthesize an unread notification from a live push payload.
    ///
    /// The payload's own timestamp is used when present; otherwise the
    /// receipt instant stands in.
    pub fn from_push(payload: &PushPayload, received_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            kind: payload.kind.clone(),
            message: payload
                .message
                .clone()
                .unwrap_or_else(|| "No message content".to_string()),
            is_read: false,
            timestamp: payload.timestamp.unwrap_or(received_at),
        }
    }

    /// Whether the notification still awaits acknowledgement.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}
