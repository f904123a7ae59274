//! Deterministic records shaped like the futures venue's payloads.

use perpetua_core::{RawRecord, SeriesType, Timestamp};
use serde_json::json;

/// Symbol stamped on every fixture record.
pub const FIXTURE_SYMBOL: &str = "BTCUSDT";

/// Eight-hour funding cadence in milliseconds.
pub const FUNDING_INTERVAL_MS: i64 = 8 * 60 * 60 * 1000;

/// Build one record for `series` at `ts`. `seq` varies the metric values.
#[must_use]
pub fn record(series: SeriesType, ts: Timestamp, seq: u64) -> RawRecord {
    let bump = seq % 97;
    let value = match series {
        SeriesType::FundingRate => json!({
            "symbol": FIXTURE_SYMBOL,
            "fundingTime": ts,
            "fundingRate": format!("0.000{:05}", 10_000 + bump),
            "markPrice": format!("{}.{:02}", 60_000 + bump, bump),
        }),
        SeriesType::OpenInterest => json!({
            "symbol": FIXTURE_SYMBOL,
            "sumOpenInterest": format!("{}.12345678", 80_000 + bump),
            "sumOpenInterestValue": format!("{}.87654321", 5_000_000_000_u64 + bump),
            "timestamp": ts,
        }),
        SeriesType::LongShortRatio => json!({
            "symbol": FIXTURE_SYMBOL,
            "longShortRatio": format!("1.{:04}", 2000 + bump),
            "longAccount": format!("0.{:04}", 5400 + bump),
            "shortAccount": format!("0.{:04}", 4600 - bump),
            "timestamp": ts,
        }),
        SeriesType::TakerVolume => json!({
            "buySellRatio": format!("1.{:04}", 100 + bump),
            "sellVol": format!("{}.5000", 300 + bump),
            "buyVol": format!("{}.2500", 310 + bump),
            "timestamp": ts,
        }),
    };
    RawRecord::new(value)
}

/// `count` records for `series` starting at `start`, spaced `step_ms` apart.
#[must_use]
pub fn series_records(
    series: SeriesType,
    start: Timestamp,
    step_ms: i64,
    count: usize,
) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            let offset = i64::try_from(i).unwrap_or(i64::MAX);
            record(series, start + offset * step_ms, i as u64)
        })
        .collect()
}

/// Just the timestamps of `records` for `series`, in order.
#[must_use]
pub fn timestamps(series: SeriesType, records: &[RawRecord]) -> Vec<Timestamp> {
    records
        .iter()
        .filter_map(|r| r.timestamp_for(series))
        .collect()
}
