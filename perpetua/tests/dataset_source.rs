mod helpers;

use std::str::FromStr;

use helpers::*;
use perpetua::{
    DatasetSource, NormalizedRecord, Period, PerpetuaError, RawRecord, SeriesDataset, SeriesType,
};
use rust_decimal::Decimal;
use serde_json::json;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[tokio::test]
async fn period_series_request_one_open_page_at_smallest_period() {
    let (client, controller) = ScriptedUpstream::new_with_controller("scripted");
    controller
        .push_batches(vec![vec![
            RawRecord::new(json!({
                "symbol": "BTCUSDT",
                "sumOpenInterest": "81234.123456789",
                "sumOpenInterestValue": "5012345678.123456789",
                "timestamp": 2_000,
            })),
            RawRecord::new(json!({
                "symbol": "BTCUSDT",
                "sumOpenInterest": "81000",
                "sumOpenInterestValue": "5000000000",
                "timestamp": 1_000,
            })),
        ]])
        .await;
    let source = SeriesDataset::new(client, SeriesType::OpenInterest);

    let items = source.next_items(500).await.expect("page");

    let calls = controller.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.start, 500);
    assert_eq!(calls[0].1.end, None);
    assert_eq!(calls[0].1.period, Some(Period::M5));

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].timestamp(), 1_000);
    assert_eq!(
        items[1],
        NormalizedRecord::OpenInterest {
            timestamp: 2_000,
            sum_open_interest: dec("81234.12345679"),
            sum_open_interest_value: dec("5012345678.12345679"),
        }
    );
}

#[tokio::test]
async fn funding_source_sends_no_period_and_rounds_to_eight_places() {
    let (client, controller) = ScriptedUpstream::new_with_controller("scripted");
    controller
        .push_batches(vec![vec![RawRecord::new(json!({
            "symbol": "BTCUSDT",
            "fundingTime": 1_568_102_400_000_i64,
            "fundingRate": "0.000100004",
        }))]])
        .await;
    let source = SeriesDataset::new(client, SeriesType::FundingRate);

    let items = source.next_items(0).await.expect("page");

    assert_eq!(controller.calls().await[0].1.period, None);
    assert_eq!(
        items,
        vec![NormalizedRecord::FundingRate {
            timestamp: 1_568_102_400_000,
            funding_rate: dec("0.00010000"),
        }]
    );
    assert_eq!(items[0].series(), SeriesType::FundingRate);
}

#[tokio::test]
async fn ratio_series_round_to_four_places() {
    let upstream = PagedUpstream::new().with_records(
        SeriesType::TakerVolume,
        vec![RawRecord::new(json!({
            "buySellRatio": "1.23456",
            "sellVol": 300.55555,
            "buyVol": "371.00004",
            "timestamp": 10,
        }))],
    );
    let source = SeriesDataset::new(std::sync::Arc::new(upstream), SeriesType::TakerVolume);

    let items = source.next_items(0).await.expect("page");
    assert_eq!(
        items,
        vec![NormalizedRecord::TakerVolume {
            timestamp: 10,
            buy_vol: dec("371.0000"),
            sell_vol: dec("300.5556"),
            buy_sell_ratio: dec("1.2346"),
        }]
    );
}

#[tokio::test]
async fn unparsable_metric_fails_the_page() {
    let (client, controller) = ScriptedUpstream::new_with_controller("scripted");
    controller
        .push_batches(vec![vec![RawRecord::new(json!({
            "longShortRatio": "n/a",
            "longAccount": "0.5",
            "shortAccount": "0.5",
            "timestamp": 1,
        }))]])
        .await;
    let source = SeriesDataset::new(client, SeriesType::LongShortRatio);

    let err = source.next_items(0).await.expect_err("bad number");
    assert!(matches!(err, PerpetuaError::UpstreamFormat(_)));
}

#[tokio::test]
async fn upstream_errors_propagate() {
    let (client, controller) = ScriptedUpstream::new_with_controller("scripted");
    let err = PerpetuaError::transport("timeout");
    controller.push_behavior(MockBehavior::Fail(err.clone())).await;
    let source = SeriesDataset::new(client, SeriesType::OpenInterest);

    assert_eq!(source.next_items(0).await.expect_err("fails"), err);
}

#[test]
fn genesis_depends_on_series() {
    let (client, _c) = ScriptedUpstream::new_with_controller("scripted");
    let now = jan2();

    let funding = SeriesDataset::new(client.clone(), SeriesType::FundingRate);
    assert_eq!(funding.genesis_timestamp(now), 1_568_102_400_000);
    assert_eq!(funding.series(), SeriesType::FundingRate);

    let oi = SeriesDataset::new(client, SeriesType::OpenInterest);
    assert_eq!(oi.genesis_timestamp(now), now - 30 * DAY_MS);
}
