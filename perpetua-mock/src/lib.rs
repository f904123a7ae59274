//! Mock upstream clients for CI-safe tests and demos.
//!
//! - [`PagedUpstream`] serves fixture records the way the futures venue
//!   pages them: bounded pages, ascending, inclusive `endTime`.
//! - [`ScriptedUpstream`] answers each call from a queue driven by a
//!   [`ScriptController`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use perpetua_core::{
    Batch, BatchQuery, PerpetuaError, RawRecord, SeriesType, Timestamp, UpstreamClient,
};

mod dynamic;
pub mod fixtures;

pub use dynamic::{MockBehavior, ScriptController, ScriptedUpstream};

/// Page cap applied when none is configured, matching the period endpoints.
pub const DEFAULT_PAGE_LIMIT: usize = 500;

/// In-memory upstream that pages stored records like the real venue.
pub struct PagedUpstream {
    records: HashMap<SeriesType, Vec<RawRecord>>,
    page_limit: usize,
    calls: AtomicUsize,
    log: Mutex<Vec<(SeriesType, BatchQuery)>>,
}

impl Default for PagedUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl PagedUpstream {
    /// Empty upstream with the default page cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            page_limit: DEFAULT_PAGE_LIMIT,
            calls: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Replace the stored records of `series`. Kept sorted by timestamp.
    #[must_use]
    pub fn with_records(mut self, series: SeriesType, mut records: Vec<RawRecord>) -> Self {
        records.sort_by_key(|r| r.timestamp_for(series).unwrap_or(Timestamp::MIN));
        self.records.insert(series, records);
        self
    }

    /// Maximum number of records returned by one call.
    #[must_use]
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Return a copy of the call log, in call order.
    pub async fn calls(&self) -> Vec<(SeriesType, BatchQuery)> {
        self.log.lock().await.clone()
    }
}

#[async_trait]
impl UpstreamClient for PagedUpstream {
    fn name(&self) -> &'static str {
        "perpetua-mock"
    }

    async fn fetch_batch(
        &self,
        series: SeriesType,
        query: BatchQuery,
    ) -> Result<Batch, PerpetuaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().await.push((series, query));
        query.resolve_period(series)?;

        let Some(stored) = self.records.get(&series) else {
            return Ok(Vec::new());
        };
        let page = stored
            .iter()
            .filter(|r| {
                r.timestamp_for(series).is_some_and(|ts| {
                    ts >= query.start && query.end.is_none_or(|end| ts <= end)
                })
            })
            .take(self.page_limit)
            .cloned()
            .collect();
        Ok(page)
    }
}
