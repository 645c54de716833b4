//! Notification domain entities.

pub mod audience;
pub mod model;
pub mod payload;

pub use audience::Audience;
pub use model::Notification;
pub use payload::PushPayload;
