//! Perpetua reconstructs futures market-metric series over arbitrary windows.
//!
//! Overview
//! - Walks a paged, rate-limited upstream forward from the window start with an
//!   advancing cursor until the window is covered, the data runs out, progress
//!   stalls, or the attempt ceiling is reached.
//! - Merges the collected pages into one deduplicated, strictly ascending
//!   sequence filtered to the half-open window `[start, end)`.
//! - Paces every upstream call through one shared throttle.
//! - Exposes the `/api/data` endpoint semantics as [`DataApi`] and a
//!   single-page [`SeriesDataset`] for incremental dataset builders.
//!
//! Key behaviors
//! - Upstream errors abort the request; there are no retries.
//! - Empty pages, stalls and the attempt ceiling end the fetch successfully;
//!   the reason is reported as a [`Termination`].
//! - Calls for one request are strictly sequential.
//!
//! Examples
//! ```rust,ignore
//! use perpetua::{Perpetua, Period, SeriesType, ThrottleConfig};
//! use perpetua_binance::BinanceClient;
//!
//! let client = BinanceClient::builder(Default::default())?.build();
//! let perpetua = Perpetua::builder()
//!     .with_client(client)
//!     .throttle(ThrottleConfig::default())
//!     .build()?;
//!
//! let result = perpetua
//!     .fetch_range(SeriesType::OpenInterest, 1_704_067_200_000, 1_704_153_600_000, Some(Period::M5))
//!     .await?;
//! println!("{} records, stopped: {:?}", result.record_count(), result.termination);
//! ```
//!
//! See `perpetua/demos/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

mod api;
pub(crate) mod core;
mod dataset;
mod fetch;

pub use api::{ApiReply, DataApi, DataQuery};
pub use core::{Perpetua, PerpetuaBuilder};
pub use dataset::SeriesDataset;
pub use fetch::{RangeFetcher, RangeRequest, RangeResult, Termination};

pub use perpetua_middleware::{ClientBuilder, RateThrottle, ThrottleMiddleware, ThrottledClient};

// Re-export core types for convenience
pub use perpetua_core::{
    ApiMeta, ApiResponse, Batch, BatchQuery, BinanceConfig, DatasetSource, FetchConfig,
    Middleware, NormalizedRecord, Period, PerpetuaConfig, PerpetuaError, RawRecord,
    RecordExtractor, SeriesType, ThrottleConfig, TimeWindow, Timestamp, UpstreamClient,
};
