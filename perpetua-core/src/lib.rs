//! perpetua-core
//!
//! Core traits and utilities shared across the perpetua ecosystem.
//!
//! - `connector`: the `UpstreamClient` and `DatasetSource` traits.
//! - `query`: per-call parameters and their period rules.
//! - `extract`: the per-series timestamp accessor / normalizer strategy.
//! - `timeseries`: helpers to merge paged series.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Clients and middleware are async and assume a Tokio 1.x runtime; the
//! throttle in `perpetua-middleware` sleeps on Tokio timers.
#![warn(missing_docs)]

/// Upstream client and dataset source traits.
pub mod connector;
/// Record extraction strategy selected by series type.
pub mod extract;
/// Middleware trait implemented by client wrappers.
pub mod middleware;
/// Per-call query parameters.
pub mod query;
/// Time-series utilities for merging paged records.
pub mod timeseries;

pub use connector::{DatasetSource, UpstreamClient};
pub use extract::{DEFAULT_LOOKBACK_DAYS, FUNDING_RATE_GENESIS_MS, RecordExtractor};
pub use middleware::Middleware;
pub use query::BatchQuery;
pub use timeseries::merge::{MergedSeries, max_timestamp, merge_records};

pub use perpetua_types::{
    ApiMeta, ApiResponse, Batch, BinanceConfig, FetchConfig, NormalizedRecord, ONE_DAY_MS, Period,
    PerpetuaConfig, PerpetuaError, RawRecord, SeriesType, ThrottleConfig, TimeWindow, Timestamp,
};
