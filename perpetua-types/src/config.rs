//! Configuration types shared across the orchestrator, middleware and clients.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One day in milliseconds.
pub const ONE_DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Settings for the range-fetch loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchConfig {
    /// Ceiling on upstream calls per request. Reaching it ends the fetch softly.
    pub max_attempts: u32,
    /// Span requested per call (`endTime - startTime`).
    ///
    /// Only shapes each call; pages are bounded by the upstream's record cap.
    pub batch_window: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 200,
            batch_window: Duration::from_millis(ONE_DAY_MS),
        }
    }
}

/// Pacing policy for outbound upstream calls.
///
/// Calls are admitted in submission order, never closer together than
/// `min_interval`, and never more than `limit` within one `window`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Minimum spacing between two admitted calls.
    pub min_interval: Duration,
    /// Maximum number of calls admitted within a single window.
    pub limit: u64,
    /// Duration of the accounting window.
    pub window: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(250),
            limit: 1000,
            window: Duration::from_secs(5 * 60),
        }
    }
}

/// Settings for the Binance futures binding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BinanceConfig {
    /// Scheme and host of the futures API.
    pub base_url: String,
    /// Traded instrument, fixed for every call.
    pub symbol: String,
    /// Transport timeout for a single call.
    pub timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://fapi.binance.com".to_string(),
            symbol: "BTCUSDT".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Global configuration for the `Perpetua` orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerpetuaConfig {
    /// Range-fetch loop settings.
    pub fetch: FetchConfig,
}
