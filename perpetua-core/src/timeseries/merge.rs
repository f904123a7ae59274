use std::collections::BTreeMap;

use crate::extract::RecordExtractor;
use perpetua_types::{RawRecord, TimeWindow, Timestamp};

/// Output of [`merge_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSeries {
    /// Deduplicated records inside the window, ascending by timestamp.
    pub records: Vec<RawRecord>,
    /// Distinct timestamps seen before the window filter was applied.
    pub unique_before_filter: usize,
}

/// Merge collected pages into a single ascending, duplicate-free series.
///
/// - Records are keyed by the extractor's timestamp; on a collision the
///   record seen last wins.
/// - Records without a readable timestamp are skipped.
/// - Only timestamps inside `[window.start, window.end)` are kept.
#[must_use]
pub fn merge_records<I>(
    collected: I,
    window: &TimeWindow,
    extractor: &RecordExtractor,
) -> MergedSeries
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut by_ts: BTreeMap<Timestamp, RawRecord> = BTreeMap::new();
    for record in collected {
        let Some(ts) = extractor.timestamp(&record) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                series = %extractor.series(),
                "skipping record with invalid timestamp during merge"
            );
            continue;
        };
        by_ts.insert(ts, record);
    }

    let unique_before_filter = by_ts.len();
    let records = by_ts
        .into_iter()
        .filter(|(ts, _)| window.contains(*ts))
        .map(|(_, record)| record)
        .collect();

    MergedSeries {
        records,
        unique_before_filter,
    }
}

/// Latest timestamp in a page, ignoring records without a readable timestamp.
#[must_use]
pub fn max_timestamp(batch: &[RawRecord], extractor: &RecordExtractor) -> Option<Timestamp> {
    batch.iter().filter_map(|r| extractor.timestamp(r)).max()
}
