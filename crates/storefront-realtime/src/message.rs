//! Wire frames exchanged on the push channel.

use serde::{Deserialize, Serialize};

use storefront_entity::notification::{Audience, PushPayload};

/// Per-principal notification destination.
pub const USER_QUEUE: &str = "/user/queue/notifications";
/// Operator broadcast destination.
pub const ADMIN_TOPIC: &str = "/topic/admin-notifications";

/// Frames sent by the client to the server.
///
/// Subscribing is the only client-initiated operation: teardown closes
/// the connection instead of unsubscribing destination by destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Subscribe to a destination.
    Subscribe {
        /// Destination path.
        destination: String,
    },
}

/// Destinations the given audience listens on.
pub fn destinations_for(audience: Audience) -> Vec<&'static str> {
    match audience {
        Audience::User => vec![USER_QUEUE],
        Audience::Admin => vec![USER_QUEUE, ADMIN_TOPIC],
    }
}

/// Parse a text frame into a push payload.
///
/// A body that is not valid JSON is wrapped as a `RAW` payload so it is
/// still delivered to subscribers.
pub fn parse_payload(body: &str) -> PushPayload {
    serde_json::from_str(body).unwrap_or_else(|_| PushPayload::raw(body))
}
