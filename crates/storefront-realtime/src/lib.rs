//! # storefront-realtime
//!
//! The push channel: a WebSocket client that subscribes to the
//! per-principal notification destination (and the operator broadcast
//! destination for admin audiences), delivers JSON push payloads to local
//! subscribers, and reconnects on drop with configurable backoff.

pub mod backoff;
pub mod channel;
pub mod message;

pub use backoff::ReconnectPolicy;
pub use channel::PushChannel;
pub use message::{ADMIN_TOPIC, ClientFrame, USER_QUEUE};
