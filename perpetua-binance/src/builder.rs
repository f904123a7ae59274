use std::sync::Arc;

use perpetua_core::{BinanceConfig, PerpetuaError, ThrottleConfig, UpstreamClient};
use perpetua_middleware::{ClientBuilder, RateThrottle};

use crate::BinanceClient;

/// Builder type alias specialized for Binance clients.
pub type BinanceClientBuilder = ClientBuilder;

impl BinanceClient {
    /// Returns an unconfigured builder wrapping a fresh client.
    ///
    /// Customize with the builder methods before calling `.build()`.
    ///
    /// # Errors
    /// Fails if the underlying client cannot be constructed.
    pub fn builder(config: BinanceConfig) -> Result<BinanceClientBuilder, PerpetuaError> {
        let raw: Arc<dyn UpstreamClient> = Arc::new(Self::new_raw(config)?);
        Ok(ClientBuilder::new(raw))
    }

    /// Returns a builder paced by the default throttle (one call per 250 ms,
    /// 1000 calls per 5 minutes).
    ///
    /// # Errors
    /// Fails if the underlying client cannot be constructed.
    pub fn rate_limited(config: BinanceConfig) -> Result<BinanceClientBuilder, PerpetuaError> {
        Ok(Self::builder(config)?.with_throttle(&ThrottleConfig::default()))
    }

    /// Returns a builder paced by a throttle shared with other clients.
    ///
    /// # Errors
    /// Fails if the underlying client cannot be constructed.
    pub fn with_shared_throttle(
        config: BinanceConfig,
        throttle: Arc<RateThrottle>,
    ) -> Result<BinanceClientBuilder, PerpetuaError> {
        Ok(Self::builder(config)?.with_shared_throttle(throttle))
    }
}
