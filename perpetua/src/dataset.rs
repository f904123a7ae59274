//! Single-page source for incremental dataset builders.

use std::sync::Arc;

use async_trait::async_trait;
use perpetua_core::{
    BatchQuery, DatasetSource, NormalizedRecord, Period, PerpetuaError, RecordExtractor,
    SeriesType, Timestamp, UpstreamClient,
};

/// [`DatasetSource`] that issues one open-ended call per step.
///
/// Period series are requested at [`Period::SMALLEST`]; funding rates carry
/// no period. Output is sorted by timestamp.
pub struct SeriesDataset {
    client: Arc<dyn UpstreamClient>,
    extractor: RecordExtractor,
}

impl SeriesDataset {
    /// Source for `series` backed by `client`.
    #[must_use]
    pub fn new(client: Arc<dyn UpstreamClient>, series: SeriesType) -> Self {
        Self {
            client,
            extractor: RecordExtractor::for_series(series),
        }
    }

    fn query(&self, start_at: Timestamp) -> BatchQuery {
        let query = BatchQuery::page(start_at);
        if self.extractor.series().requires_period() {
            query.with_period(Period::SMALLEST)
        } else {
            query
        }
    }
}

#[async_trait]
impl DatasetSource for SeriesDataset {
    fn series(&self) -> SeriesType {
        self.extractor.series()
    }

    fn genesis_timestamp(&self, now: Timestamp) -> Timestamp {
        self.extractor.genesis_timestamp(now)
    }

    async fn next_items(
        &self,
        start_at: Timestamp,
    ) -> Result<Vec<NormalizedRecord>, PerpetuaError> {
        let series = self.extractor.series();
        let batch = self
            .client
            .fetch_batch(series, self.query(start_at))
            .await?;

        let mut items = batch
            .iter()
            .map(|r| self.extractor.normalize(r))
            .collect::<Result<Vec<_>, _>>()?;
        items.sort_by_key(NormalizedRecord::timestamp);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            series = %series,
            start_at = %crate::core::rfc3339(start_at),
            items = items.len(),
            "dataset page normalized"
        );
        Ok(items)
    }
}
