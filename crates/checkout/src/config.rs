//! Checkout configuration loaded from environment variables.

use std::time::Duration;

/// Delays for the background order-status transitions and the worker's
/// polling cadence.
///
/// Reads from environment variables:
/// - `CHECKOUT_PROCESSING_DELAY_SECS` — pending→processing delay (default: `60`)
/// - `CHECKOUT_SHIPPING_DELAY_SECS` — processing→shipped delay (default: `300`)
/// - `CHECKOUT_POLL_INTERVAL_MS` — worker polling interval (default: `500`)
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// How long after checkout an order moves to processing.
    pub processing_delay: Duration,

    /// How long after processing an order moves to shipped.
    pub shipping_delay: Duration,

    /// How often the transition worker polls for due jobs.
    pub poll_interval: Duration,
}

impl CheckoutConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            processing_delay: env_secs("CHECKOUT_PROCESSING_DELAY_SECS")
                .unwrap_or(defaults.processing_delay),
            shipping_delay: env_secs("CHECKOUT_SHIPPING_DELAY_SECS")
                .unwrap_or(defaults.shipping_delay),
            poll_interval: std::env::var("CHECKOUT_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
        }
    }

    /// Zero delays, so transitions become due immediately. For tests.
    pub fn immediate() -> Self {
        Self {
            processing_delay: Duration::ZERO,
            shipping_delay: Duration::ZERO,
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_secs(60),
            shipping_delay: Duration::from_secs(300),
            poll_interval: Duration::from_millis(500),
        }
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
}
