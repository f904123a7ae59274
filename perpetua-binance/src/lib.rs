//! perpetua-binance
//!
//! Upstream binding that implements `UpstreamClient` on top of the Binance
//! USD-M futures public REST API. Each series maps to one endpoint; every call
//! fixes the configured symbol and the endpoint's page cap.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod builder;

use std::sync::Arc;

use adapter::{BinanceHttp, RealAdapter, UpstreamResponse};
use async_trait::async_trait;
use perpetua_core::{
    Batch, BatchQuery, BinanceConfig, Period, PerpetuaError, RawRecord, SeriesType, UpstreamClient,
};
use serde_json::Value;

pub use builder::BinanceClientBuilder;

/// Path and page cap of the endpoint serving one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Path relative to the API host.
    pub path: &'static str,
    /// Maximum records per page.
    pub limit: u32,
}

impl Endpoint {
    /// Endpoint for `series`.
    #[must_use]
    pub const fn for_series(series: SeriesType) -> Self {
        match series {
            SeriesType::FundingRate => Self {
                path: "/fapi/v1/fundingRate",
                limit: 1000,
            },
            SeriesType::OpenInterest => Self {
                path: "/futures/data/openInterestHist",
                limit: 500,
            },
            SeriesType::LongShortRatio => Self {
                path: "/futures/data/globalLongShortAccountRatio",
                limit: 500,
            },
            SeriesType::TakerVolume => Self {
                path: "/futures/data/takerlongshortRatio",
                limit: 500,
            },
        }
    }
}

/// Public client type. Production users will construct with `BinanceClient::new_raw`
/// or one of the builder entry points.
pub struct BinanceClient {
    config: BinanceConfig,
    http: Arc<dyn BinanceHttp>,
}

impl BinanceClient {
    /// Client name used in logs and error tagging.
    pub const NAME: &'static str = "perpetua-binance";

    /// Build with a fresh `reqwest::Client` inside.
    ///
    /// # Errors
    /// Fails if the base URL does not parse or the HTTP client cannot be built.
    pub fn new_raw(config: BinanceConfig) -> Result<Self, PerpetuaError> {
        let adapter = RealAdapter::new(&config)?;
        Ok(Self {
            config,
            http: Arc::new(adapter),
        })
    }

    /// Build from a custom HTTP adapter (tests only).
    #[cfg(feature = "test-adapters")]
    #[must_use]
    pub fn from_adapter(config: BinanceConfig, http: Arc<dyn BinanceHttp>) -> Self {
        Self { config, http }
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &BinanceConfig {
        &self.config
    }

    /// Query parameters in the order the venue documents them.
    fn params(
        &self,
        endpoint: Endpoint,
        period: Option<Period>,
        query: &BatchQuery,
    ) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        params.push(("symbol", self.config.symbol.clone()));
        if let Some(p) = period {
            params.push(("period", p.as_str().to_string()));
        }
        params.push(("limit", endpoint.limit.to_string()));
        params.push(("startTime", query.start.to_string()));
        if let Some(end) = query.end {
            params.push(("endTime", end.to_string()));
        }
        params
    }
}

/// Check a response and return its records.
///
/// # Errors
/// - `UpstreamStatus` when the status is not 200, with the venue's `msg` if present.
/// - `UpstreamTransport` when the body is missing or not JSON.
/// - `UpstreamFormat` when the JSON body is not an array of records.
pub fn validate_response(response: UpstreamResponse) -> Result<Vec<Value>, PerpetuaError> {
    if response.status_code != 200 {
        let message = response
            .data
            .as_ref()
            .and_then(|d| d.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(PerpetuaError::status(response.status_code, message));
    }
    match response.data {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(PerpetuaError::format(format!(
            "Received: {}",
            json_kind(&other)
        ))),
        None => Err(PerpetuaError::transport("no JSON body in the response")),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl UpstreamClient for BinanceClient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_batch(
        &self,
        series: SeriesType,
        query: BatchQuery,
    ) -> Result<Batch, PerpetuaError> {
        let period = query.resolve_period(series)?;
        let endpoint = Endpoint::for_series(series);
        let params = self.params(endpoint, period, &query);

        let response = self.http.get(endpoint.path, &params).await?;
        let items = validate_response(response)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            symbol = %self.config.symbol,
            path = endpoint.path,
            start = query.start,
            records = items.len(),
            "received upstream page"
        );
        Ok(items.into_iter().map(RawRecord::new).collect())
    }
}
