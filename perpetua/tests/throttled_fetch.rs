mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::*;
use perpetua::{Perpetua, RateThrottle, SeriesType, Termination, ThrottleConfig};
use tokio::time::Instant;

fn pacing(min_interval_ms: u64) -> ThrottleConfig {
    ThrottleConfig {
        min_interval: Duration::from_millis(min_interval_ms),
        limit: 1000,
        window: Duration::from_secs(300),
    }
}

#[tokio::test(start_paused = true)]
async fn consecutive_pages_are_spaced_by_min_interval() {
    let upstream = Arc::new(
        PagedUpstream::new()
            .with_records(SeriesType::OpenInterest, spaced(SeriesType::OpenInterest, jan1(), 5 * MINUTE_MS, 12))
            .with_page_limit(3),
    );
    let perpetua = Perpetua::builder()
        .with_client(upstream.clone())
        .throttle(pacing(250))
        .build()
        .expect("build");

    let started = Instant::now();
    let result = perpetua
        .fetch_range(
            SeriesType::OpenInterest,
            jan1(),
            jan1() + HOUR_MS,
            Some(perpetua::Period::M5),
        )
        .await
        .expect("fetch");

    assert_eq!(result.record_count(), 12);
    assert_eq!(result.termination, Termination::Exhausted);
    // Four full pages then one empty page, the first admitted immediately.
    assert_eq!(upstream.call_count(), 5);
    assert_eq!(started.elapsed(), Duration::from_millis(4 * 250));
}

#[tokio::test(start_paused = true)]
async fn shared_throttle_paces_two_orchestrators_together() {
    let throttle = RateThrottle::shared(pacing(100));
    let records = spaced(SeriesType::OpenInterest, jan1(), 5 * MINUTE_MS, 2);
    let build = || {
        let upstream = PagedUpstream::new()
            .with_records(SeriesType::OpenInterest, records.clone())
            .with_page_limit(10);
        Perpetua::builder()
            .with_client(Arc::new(upstream))
            .shared_throttle(Arc::clone(&throttle))
            .build()
            .expect("build")
    };
    let (a, b) = (build(), build());

    let started = Instant::now();
    let end = jan1() + 5 * MINUTE_MS + 1;
    let (ra, rb) = tokio::join!(
        a.fetch_range(SeriesType::OpenInterest, jan1(), end, Some(perpetua::Period::M5)),
        b.fetch_range(SeriesType::OpenInterest, jan1(), end, Some(perpetua::Period::M5)),
    );

    // Each covers the window in one page; two admissions through one throttle.
    assert_eq!(ra.expect("a").termination, Termination::WindowCovered);
    assert_eq!(rb.expect("b").termination, Termination::WindowCovered);
    assert_eq!(started.elapsed(), Duration::from_millis(100));
}

#[tokio::test]
async fn builder_rejects_degenerate_loop_settings() {
    let (client, _c) = ScriptedUpstream::new_with_controller("scripted");

    let err = Perpetua::builder()
        .with_client(client.clone())
        .max_attempts(0)
        .build()
        .err()
        .expect("zero attempts");
    assert!(err.is_validation());

    let err = Perpetua::builder()
        .with_client(client)
        .batch_window(Duration::ZERO)
        .build()
        .err()
        .expect("zero window");
    assert!(err.is_validation());

    let err = Perpetua::builder().build().err().expect("no client");
    assert!(err.is_validation());
}
