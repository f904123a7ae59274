use perpetua_core::{RawRecord, RecordExtractor, SeriesType, TimeWindow, merge_records};
use proptest::prelude::*;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

fn oi(ts: i64, tag: u32) -> RawRecord {
    RawRecord::new(json!({
        "symbol": "BTCUSDT",
        "sumOpenInterest": tag.to_string(),
        "sumOpenInterestValue": "1",
        "timestamp": ts,
    }))
}

fn arb_records() -> impl Strategy<Value = Vec<RawRecord>> {
    proptest::collection::vec((0i64..10_000i64, any::<u32>()), 0..300)
        .prop_map(|v| v.into_iter().map(|(ts, tag)| oi(ts, tag)).collect())
}

fn arb_window() -> impl Strategy<Value = TimeWindow> {
    (0i64..10_000i64, 1i64..10_000i64).prop_map(|(s, len)| TimeWindow::new(s, s + len).unwrap())
}

fn ts_of(r: &RawRecord) -> i64 {
    r.timestamp_for(SeriesType::OpenInterest).unwrap()
}

proptest! {
    #[test]
    fn output_is_strictly_ascending_and_inside_window(records in arb_records(), window in arb_window()) {
        let ex = RecordExtractor::for_series(SeriesType::OpenInterest);
        let merged = merge_records(records, &window, &ex);
        let mut prev: Option<i64> = None;
        for r in &merged.records {
            let ts = ts_of(r);
            prop_assert!(window.contains(ts));
            if let Some(p) = prev { prop_assert!(p < ts); }
            prev = Some(ts);
        }
    }

    #[test]
    fn last_write_wins_on_collisions(records in arb_records()) {
        let window = TimeWindow::new(0, 10_000).unwrap();
        let mut last_by_ts: BTreeMap<i64, RawRecord> = BTreeMap::new();
        for r in &records {
            last_by_ts.insert(ts_of(r), r.clone());
        }
        let ex = RecordExtractor::for_series(SeriesType::OpenInterest);
        let merged = merge_records(records, &window, &ex);
        prop_assert_eq!(merged.records.len(), last_by_ts.len());
        for r in &merged.records {
            prop_assert_eq!(Some(r), last_by_ts.get(&ts_of(r)));
        }
    }

    #[test]
    fn unique_count_ignores_the_window(records in arb_records(), window in arb_window()) {
        let distinct: BTreeSet<i64> = records.iter().map(ts_of).collect();
        let ex = RecordExtractor::for_series(SeriesType::OpenInterest);
        let merged = merge_records(records, &window, &ex);
        prop_assert_eq!(merged.unique_before_filter, distinct.len());
        prop_assert!(merged.records.len() <= merged.unique_before_filter);
    }

    #[test]
    fn merge_is_idempotent(records in arb_records(), window in arb_window()) {
        let ex = RecordExtractor::for_series(SeriesType::OpenInterest);
        let once = merge_records(records, &window, &ex);
        let twice = merge_records(once.records.clone(), &window, &ex);
        prop_assert_eq!(once.records, twice.records);
    }
}

#[test]
fn records_without_timestamp_are_skipped() {
    let ex = RecordExtractor::for_series(SeriesType::FundingRate);
    let window = TimeWindow::new(0, 100).unwrap();
    let records = vec![
        RawRecord::new(json!({"fundingTime": 10, "fundingRate": "0.0001"})),
        RawRecord::new(json!({"timestamp": 20, "fundingRate": "0.0002"})),
        RawRecord::new(json!({"fundingTime": "30", "fundingRate": "0.0003"})),
    ];
    let merged = merge_records(records, &window, &ex);
    assert_eq!(merged.records.len(), 1);
    assert_eq!(merged.unique_before_filter, 1);
}
