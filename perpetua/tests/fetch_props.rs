mod helpers;

use std::collections::BTreeSet;
use std::sync::Arc;

use helpers::*;
use perpetua::{Period, SeriesType};
use proptest::prelude::*;

const OI: SeriesType = SeriesType::OpenInterest;

fn upstream_with(ts: &[i64], page_limit: usize) -> Arc<PagedUpstream> {
    let records = ts.iter().map(|&t| oi(t)).collect();
    Arc::new(
        PagedUpstream::new()
            .with_records(OI, records)
            .with_page_limit(page_limit),
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    // Timestamps on a 10 ms grid and an off-grid window start keep every
    // cursor off a record, so the walk never stalls.
    #[test]
    fn reconstructs_every_record_in_the_window(
        slots in proptest::collection::btree_set(0i64..20_000, 0..120),
        start_slot in 0i64..10_000,
        span_slots in 1i64..15_000,
        page_limit in 1usize..40,
    ) {
        let ts: Vec<i64> = slots.iter().map(|s| s * 10).collect();
        let start = start_slot * 10 + 3;
        let end = start + span_slots * 10;

        tokio_test::block_on(async move {
            let perpetua = perpetua_over(upstream_with(&ts, page_limit));
            let result = perpetua
                .fetch_range(OI, start, end, Some(Period::M5))
                .await
                .expect("fetch ok");

            let expected: Vec<i64> = ts.iter().copied().filter(|t| (start..end).contains(t)).collect();
            assert_eq!(ts_of(OI, &result.records), expected);
            assert_eq!(result.unique_before_filter, result.record_count());
            assert!(!result.termination.is_partial());
        });
    }

    #[test]
    fn output_is_ascending_unique_and_inside_the_window(
        raw in proptest::collection::vec(0i64..5_000, 0..150),
        start in 0i64..2_500,
        span in 1i64..3_000,
        page_limit in 1usize..20,
        max_attempts in 1u32..50,
    ) {
        let end = start + span;
        tokio_test::block_on(async move {
            let upstream = upstream_with(&raw, page_limit);
            let perpetua = perpetua::Perpetua::builder()
                .with_client(upstream.clone())
                .max_attempts(max_attempts)
                .build()
                .unwrap();

            let result = perpetua
                .fetch_range(OI, start, end, Some(Period::M5))
                .await
                .expect("fetch ok");
            let got = ts_of(OI, &result.records);

            assert!(got.windows(2).all(|w| w[0] < w[1]), "not strictly ascending: {got:?}");
            assert!(got.iter().all(|t| (start..end).contains(t)));
            let stored: BTreeSet<i64> = raw.iter().copied().collect();
            assert!(got.iter().all(|t| stored.contains(t)));
            assert!(result.calls <= max_attempts);
            assert_eq!(upstream.call_count(), result.calls as usize);
        });
    }

    #[test]
    fn repeated_requests_are_identical(
        raw in proptest::collection::vec(0i64..5_000, 0..100),
        start in 0i64..2_500,
        span in 1i64..3_000,
        page_limit in 1usize..20,
    ) {
        tokio_test::block_on(async move {
            let perpetua = perpetua_over(upstream_with(&raw, page_limit));
            let a = perpetua
                .fetch_range(OI, start, start + span, Some(Period::M5))
                .await
                .unwrap();
            let b = perpetua
                .fetch_range(OI, start, start + span, Some(Period::M5))
                .await
                .unwrap();
            assert_eq!(a, b);
        });
    }
}
