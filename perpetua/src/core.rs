use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat};
use perpetua_core::{
    Period, PerpetuaConfig, PerpetuaError, SeriesType, ThrottleConfig, TimeWindow, Timestamp,
    UpstreamClient,
};
use perpetua_middleware::{ClientBuilder, RateThrottle};

use crate::fetch::{RangeFetcher, RangeRequest, RangeResult};

/// Render epoch milliseconds as RFC 3339 for logs and messages.
pub(crate) fn rfc3339(ts: Timestamp) -> String {
    DateTime::from_timestamp_millis(ts).map_or_else(
        || ts.to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Orchestrator that reconstructs series windows from one upstream client.
pub struct Perpetua {
    pub(crate) client: Arc<dyn UpstreamClient>,
    pub(crate) cfg: PerpetuaConfig,
}

/// Builder for constructing a `Perpetua` orchestrator with custom configuration.
pub struct PerpetuaBuilder {
    client: Option<Arc<dyn UpstreamClient>>,
    throttle: Option<Arc<RateThrottle>>,
    cfg: PerpetuaConfig,
}

impl Default for PerpetuaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PerpetuaBuilder {
    /// Create a new builder with default loop settings and no client.
    ///
    /// Behavior and trade-offs:
    /// - You must register a client via [`with_client`](Self::with_client).
    /// - No throttle is added unless requested; wrap the client yourself or use
    ///   [`throttle`](Self::throttle) / [`shared_throttle`](Self::shared_throttle).
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: None,
            throttle: None,
            cfg: PerpetuaConfig::default(),
        }
    }

    /// Register the upstream client. Replaces any previous one.
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn UpstreamClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Pace every upstream call through a fresh throttle built from `cfg`.
    #[must_use]
    pub fn throttle(mut self, cfg: ThrottleConfig) -> Self {
        self.throttle = Some(RateThrottle::shared(cfg));
        self
    }

    /// Pace every upstream call through an existing throttle.
    ///
    /// Share one instance across orchestrators that hit the same upstream.
    #[must_use]
    pub fn shared_throttle(mut self, throttle: Arc<RateThrottle>) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Set the ceiling on upstream calls that advance the cursor.
    ///
    /// Behavior and trade-offs:
    /// - Reaching the ceiling ends the fetch softly with whatever was collected.
    /// - Small periods over long windows need more calls; raise it accordingly.
    #[must_use]
    pub const fn max_attempts(mut self, attempts: u32) -> Self {
        self.cfg.fetch.max_attempts = attempts;
        self
    }

    /// Set the span requested per call.
    ///
    /// Pages are bounded by the upstream's record cap, so this only shapes
    /// each call's `endTime`.
    #[must_use]
    pub const fn batch_window(mut self, window: Duration) -> Self {
        self.cfg.fetch.batch_window = window;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: PerpetuaConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the `Perpetua` orchestrator.
    ///
    /// # Errors
    /// Returns `Validation` if no client was registered, or if `max_attempts`
    /// or `batch_window` is zero.
    pub fn build(self) -> Result<Perpetua, PerpetuaError> {
        let Some(client) = self.client else {
            return Err(PerpetuaError::validation(
                "no upstream client registered; add one via with_client(...)",
            ));
        };
        if self.cfg.fetch.max_attempts == 0 {
            return Err(PerpetuaError::validation("max_attempts must be at least 1"));
        }
        if self.cfg.fetch.batch_window.is_zero() {
            return Err(PerpetuaError::validation("batch_window must be non-zero"));
        }

        let client = match self.throttle {
            Some(throttle) => ClientBuilder::new(client)
                .with_shared_throttle(throttle)
                .build(),
            None => client,
        };

        Ok(Perpetua {
            client,
            cfg: self.cfg,
        })
    }
}

impl Perpetua {
    /// Start building a new `Perpetua` instance.
    ///
    /// ```rust,ignore
    /// use perpetua::{Perpetua, ThrottleConfig};
    /// use perpetua_binance::BinanceClient;
    ///
    /// let client = BinanceClient::builder(Default::default())?.build();
    /// let perpetua = Perpetua::builder()
    ///     .with_client(client)
    ///     .throttle(ThrottleConfig::default())
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> PerpetuaBuilder {
        PerpetuaBuilder::new()
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &PerpetuaConfig {
        &self.cfg
    }

    /// The (possibly throttled) upstream client.
    #[must_use]
    pub fn client(&self) -> Arc<dyn UpstreamClient> {
        Arc::clone(&self.client)
    }

    /// A range fetcher over this orchestrator's client and loop settings.
    #[must_use]
    pub fn fetcher(&self) -> RangeFetcher {
        RangeFetcher::new(Arc::clone(&self.client), self.cfg.fetch.clone())
    }

    /// Reconstruct `[start, end)` of `series` at `period`.
    ///
    /// # Errors
    /// - `Validation` if `start >= end` or the period combination is invalid;
    ///   no upstream call is made in that case.
    /// - Any upstream error, unchanged.
    pub async fn fetch_range(
        &self,
        series: SeriesType,
        start: Timestamp,
        end: Timestamp,
        period: Option<Period>,
    ) -> Result<RangeResult, PerpetuaError> {
        let window = TimeWindow::new(start, end)?;
        let request = RangeRequest::new(series, window, period)?;
        self.fetch(&request).await
    }

    /// Reconstruct a pre-validated request.
    ///
    /// # Errors
    /// Any upstream error, unchanged.
    pub async fn fetch(&self, request: &RangeRequest) -> Result<RangeResult, PerpetuaError> {
        self.fetcher().fetch(request).await
    }
}
