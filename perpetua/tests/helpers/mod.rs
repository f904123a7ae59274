// Shared fixtures for the perpetua integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use perpetua::{Perpetua, RawRecord, SeriesType, Timestamp, UpstreamClient};
use perpetua_mock::fixtures;

pub use perpetua_mock::{MockBehavior, PagedUpstream, ScriptController, ScriptedUpstream};

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Construct a UTC instant in epoch milliseconds from date components.
pub fn ms(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> Timestamp {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(hh, mm, 0))
        .expect("valid date")
        .and_utc()
        .timestamp_millis()
}

/// 2024-01-01T00:00:00Z
pub fn jan1() -> Timestamp {
    ms(2024, 1, 1, 0, 0)
}

/// 2024-01-02T00:00:00Z
pub fn jan2() -> Timestamp {
    ms(2024, 1, 2, 0, 0)
}

pub fn rec(series: SeriesType, ts: Timestamp) -> RawRecord {
    fixtures::record(series, ts, u64::try_from(ts.rem_euclid(1_000)).unwrap_or(0))
}

pub fn oi(ts: Timestamp) -> RawRecord {
    rec(SeriesType::OpenInterest, ts)
}

pub fn spaced(series: SeriesType, start: Timestamp, step: i64, count: usize) -> Vec<RawRecord> {
    fixtures::series_records(series, start, step, count)
}

pub fn ts_of(series: SeriesType, records: &[RawRecord]) -> Vec<Timestamp> {
    fixtures::timestamps(series, records)
}

/// Orchestrator over `client` with default loop settings and no throttle.
pub fn perpetua_over(client: Arc<dyn UpstreamClient>) -> Perpetua {
    Perpetua::builder()
        .with_client(client)
        .build()
        .expect("orchestrator builds")
}

/// Scripted upstream plus an orchestrator over it.
pub fn scripted() -> (Perpetua, ScriptController) {
    let (client, controller) = ScriptedUpstream::new_with_controller("scripted");
    (perpetua_over(client), controller)
}
