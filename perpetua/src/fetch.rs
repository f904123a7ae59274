//! Cursor-driven range reconstruction over a paged upstream.

use std::sync::Arc;

use perpetua_core::{
    BatchQuery, FetchConfig, MergedSeries, Period, PerpetuaError, RawRecord, RecordExtractor,
    SeriesType, TimeWindow, Timestamp, UpstreamClient, max_timestamp, merge_records,
};
use serde::Serialize;

/// Why the fetch loop stopped. Every variant is a successful outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// The cursor moved past the window end.
    WindowCovered,
    /// The upstream returned an empty page.
    Exhausted,
    /// A non-empty page did not move the cursor forward.
    Stalled,
    /// The attempt ceiling was reached before the window was covered.
    MaxAttempts,
}

impl Termination {
    /// Whether the window may be only partially covered.
    #[must_use]
    pub const fn is_partial(self) -> bool {
        matches!(self, Self::Stalled | Self::MaxAttempts)
    }
}

/// A validated range request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    series: SeriesType,
    window: TimeWindow,
    period: Option<Period>,
}

impl RangeRequest {
    /// Validate the series/period combination for a windowed fetch.
    ///
    /// # Errors
    /// Returns `Validation` when a period is given for funding rates or is
    /// missing for any other series.
    pub fn new(
        series: SeriesType,
        window: TimeWindow,
        period: Option<Period>,
    ) -> Result<Self, PerpetuaError> {
        let period = BatchQuery::range(window.start(), window.end(), period).resolve_period(series)?;
        Ok(Self {
            series,
            window,
            period,
        })
    }

    /// Series to fetch.
    #[must_use]
    pub const fn series(&self) -> SeriesType {
        self.series
    }

    /// Requested window.
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        self.window
    }

    /// Period sent upstream, `None` for funding rates.
    #[must_use]
    pub const fn period(&self) -> Option<Period> {
        self.period
    }
}

/// Deduplicated, ascending records of one window plus fetch metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeResult {
    /// Records with timestamps in the window, strictly ascending.
    pub records: Vec<RawRecord>,
    /// Series fetched.
    pub series: SeriesType,
    /// Requested window.
    pub window: TimeWindow,
    /// Period sent upstream.
    pub period: Option<Period>,
    /// Unique records collected before the final window filter.
    pub unique_before_filter: usize,
    /// Why the loop stopped.
    pub termination: Termination,
    /// Upstream calls issued.
    pub calls: u32,
}

impl RangeResult {
    /// Records returned after filtering.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Walks a window forward page by page through one upstream client.
///
/// Calls are issued strictly one after another: each page's start depends on
/// the previous page's last timestamp.
pub struct RangeFetcher {
    client: Arc<dyn UpstreamClient>,
    config: FetchConfig,
}

impl RangeFetcher {
    /// Fetcher over `client` with the given loop settings.
    #[must_use]
    pub const fn new(client: Arc<dyn UpstreamClient>, config: FetchConfig) -> Self {
        Self { client, config }
    }

    /// Loop settings in effect.
    #[must_use]
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn batch_window_ms(&self) -> i64 {
        i64::try_from(self.config.batch_window.as_millis())
            .unwrap_or(i64::MAX)
            .max(1)
    }

    /// Reconstruct `request.window()` from the upstream.
    ///
    /// # Errors
    /// Any upstream error aborts the fetch and is returned unchanged; nothing
    /// collected so far is returned. Empty, stalled and over-budget fetches
    /// are successes, see [`Termination`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "perpetua::fetch::range",
            skip(self, request),
            fields(
                series = %request.series(),
                period = ?request.period().map(Period::as_str),
                start = %crate::core::rfc3339(request.window().start()),
                end = %crate::core::rfc3339(request.window().end()),
            ),
        )
    )]
    pub async fn fetch(&self, request: &RangeRequest) -> Result<RangeResult, PerpetuaError> {
        let series = request.series();
        let window = request.window();
        let extractor = RecordExtractor::for_series(series);
        let batch_window = self.batch_window_ms();

        let mut cursor: Timestamp = window.start();
        let mut attempts: u32 = 0;
        let mut calls: u32 = 0;
        let mut collected: Vec<RawRecord> = Vec::new();
        let mut termination = Termination::MaxAttempts;

        while cursor < window.end() && attempts < self.config.max_attempts {
            let batch_end = cursor.saturating_add(batch_window).min(window.end());
            let query = BatchQuery::range(cursor, batch_end, request.period());
            calls += 1;
            let batch = self.client.fetch_batch(series, query).await?;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                cursor = %crate::core::rfc3339(cursor),
                batch_end = %crate::core::rfc3339(batch_end),
                records = batch.len(),
                "fetched batch"
            );

            if batch.is_empty() {
                termination = Termination::Exhausted;
                break;
            }

            let mut malformed = 0usize;
            for record in &batch {
                match extractor.timestamp(record) {
                    Some(ts) if window.contains(ts) => collected.push(record.clone()),
                    Some(_) => {}
                    None => malformed += 1,
                }
            }
            if malformed > 0 {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    malformed,
                    field = series.timestamp_field(),
                    "dropping records without a numeric timestamp"
                );
            }

            let progressed = max_timestamp(&batch, &extractor).filter(|&max_ts| max_ts > cursor);
            let Some(max_ts) = progressed else {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    cursor = %crate::core::rfc3339(cursor),
                    "latest timestamp in batch is not after the cursor; stopping"
                );
                termination = Termination::Stalled;
                break;
            };

            cursor = max_ts.saturating_add(1);
            if cursor >= window.end() {
                termination = Termination::WindowCovered;
                break;
            }

            attempts += 1;
            if attempts >= self.config.max_attempts {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    max_attempts = self.config.max_attempts,
                    cursor = %crate::core::rfc3339(cursor),
                    "attempt ceiling reached before the window end"
                );
                termination = Termination::MaxAttempts;
                break;
            }
        }

        let MergedSeries {
            records,
            unique_before_filter,
        } = merge_records(collected, &window, &extractor);

        #[cfg(feature = "tracing")]
        tracing::info!(
            records = records.len(),
            unique_before_filter,
            calls,
            termination = ?termination,
            "range fetch finished"
        );

        Ok(RangeResult {
            records,
            series,
            window,
            period: request.period(),
            unique_before_filter,
            termination,
            calls,
        })
    }
}
