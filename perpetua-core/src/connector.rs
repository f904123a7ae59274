use async_trait::async_trait;

use crate::PerpetuaError;
use crate::query::BatchQuery;
use perpetua_types::{Batch, NormalizedRecord, SeriesType, Timestamp};

/// Binding to an upstream that serves bounded pages of series records.
///
/// Implementations fix the traded instrument and the page-size limit, always
/// send `query.start` as the page start, and validate the transport and
/// payload shape before returning. They must not retry.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Human-readable client name for logging and error tagging.
    fn name(&self) -> &'static str;

    /// Fetch one page of `series` records starting at `query.start`.
    ///
    /// # Errors
    /// - `Validation` if the query's period combination is not allowed for `series`.
    /// - `UpstreamTransport`, `UpstreamStatus` or `UpstreamFormat` when the
    ///   upstream call or its payload is unusable.
    async fn fetch_batch(&self, series: SeriesType, query: BatchQuery)
    -> Result<Batch, PerpetuaError>;
}

/// Single-page source feeding an incremental dataset builder.
///
/// The builder tracks its own last-written timestamp and calls
/// [`next_items`](DatasetSource::next_items) repeatedly; when no prior output
/// exists it starts from [`genesis_timestamp`](DatasetSource::genesis_timestamp).
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Series produced by this source.
    fn series(&self) -> SeriesType;

    /// First timestamp to request when the dataset is empty.
    fn genesis_timestamp(&self, now: Timestamp) -> Timestamp;

    /// Fetch and normalize the page that starts at `start_at`.
    ///
    /// # Errors
    /// Propagates upstream failures unchanged and returns `UpstreamFormat`
    /// when a record cannot be normalized.
    async fn next_items(&self, start_at: Timestamp)
    -> Result<Vec<NormalizedRecord>, PerpetuaError>;
}
