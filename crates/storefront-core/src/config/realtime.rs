//! Push channel (WebSocket) configuration.

use serde::{Deserialize, Serialize};

/// Push channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket endpoint URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Internal broadcast buffer size for delivered payloads.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Reconnect backoff policy.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            channel_buffer_size: default_channel_buffer(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// Reconnect backoff settings for the push channel.
///
/// The delay starts at `initial_delay_ms`, grows by `multiplier` after each
/// failed attempt, and is capped at `max_delay_ms`. A random jitter of up to
/// `jitter` (fraction of the computed delay) is added to each wait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Delay before the first reconnect attempt, in milliseconds.
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// Upper bound on the reconnect delay, in milliseconds.
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    /// Growth factor applied after each failed attempt.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Jitter fraction in `[0, 1]` added on top of the computed delay.
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            jitter: default_jitter(),
        }
    }
}

fn default_url() -> String {
    "ws://localhost:8080/ws".to_string()
}

fn default_channel_buffer() -> usize {
    256
}

fn default_initial_delay() -> u64 {
    5_000
}

fn default_max_delay() -> u64 {
    60_000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_jitter() -> f64 {
    0.1
}
