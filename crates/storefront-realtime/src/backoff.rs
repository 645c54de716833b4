//! Reconnect backoff policy.

use std::time::Duration;

use rand::RngExt;

use storefront_core::config::realtime::ReconnectConfig;

/// Computes successive reconnect delays.
///
/// The delay grows geometrically from the configured initial value up to
/// the cap, with a random jitter fraction added so that a fleet of clients
/// does not reconnect in lockstep. `reset` is called after a successful
/// connection so the next drop starts over from the initial delay.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Backoff configuration.
    config: ReconnectConfig,
    /// Number of consecutive failed attempts.
    attempt: u32,
}

impl ReconnectPolicy {
    /// Create a policy from configuration.
    pub fn new(config: ReconnectConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Delay to wait before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.config.initial_delay_ms as f64
            * self.config.multiplier.powi(self.attempt as i32);
        let capped = base.min(self.config.max_delay_ms as f64);
        let jitter = capped * self.config.jitter * rand::rng().random_range(0.0..=1.0);
        self.attempt = self.attempt.saturating_add(1);
        Duration::from_millis((capped + jitter) as u64)
    }

    /// Forget accumulated failures after a successful connection.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
