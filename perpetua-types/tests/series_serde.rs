use std::str::FromStr;

use perpetua_types::{ApiMeta, ApiResponse, Period, PerpetuaError, RawRecord, SeriesType};
use serde_json::json;

#[test]
fn series_type_uses_wire_names() {
    for series in SeriesType::ALL {
        let json = serde_json::to_string(&series).expect("serialize series");
        assert_eq!(json, format!("\"{}\"", series.as_str()));
        assert_eq!(SeriesType::from_str(series.as_str()).unwrap(), series);
    }
}

#[test]
fn unknown_series_is_a_validation_error() {
    let err = SeriesType::from_str("markPrice").expect_err("unknown series");
    assert!(err.is_validation());
    assert!(err.to_string().contains("Unsupported data type: markPrice"));
}

#[test]
fn only_funding_rate_skips_the_period() {
    assert!(!SeriesType::FundingRate.requires_period());
    assert!(SeriesType::OpenInterest.requires_period());
    assert!(SeriesType::LongShortRatio.requires_period());
    assert!(SeriesType::TakerVolume.requires_period());
}

#[test]
fn funding_rate_reports_hourly_period() {
    assert_eq!(
        SeriesType::FundingRate.effective_period_label(None),
        Some("1h")
    );
    assert_eq!(
        SeriesType::OpenInterest.effective_period_label(Some(Period::M15)),
        Some("15m")
    );
    assert_eq!(SeriesType::TakerVolume.effective_period_label(None), None);
}

#[test]
fn periods_parse_and_measure() {
    let labels: Vec<&str> = Period::ALL.iter().map(|p| p.as_str()).collect();
    assert_eq!(
        labels,
        ["5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d"]
    );
    assert_eq!(Period::from_str("4h").unwrap(), Period::H4);
    assert_eq!(Period::SMALLEST, Period::M5);
    assert_eq!(Period::M5.as_millis(), 300_000);
    assert_eq!(Period::D1.as_millis(), 86_400_000);
    assert!(Period::from_str("3m").unwrap_err().is_validation());
    assert_eq!(serde_json::to_string(&Period::H12).unwrap(), "\"12h\"");
}

#[test]
fn raw_record_serializes_verbatim() {
    let value = json!({"symbol": "BTCUSDT", "fundingTime": 1_700_000_000_000_i64, "fundingRate": "0.0001"});
    let record = RawRecord::new(value.clone());
    assert_eq!(serde_json::to_value(&record).unwrap(), value);
    assert_eq!(
        record.timestamp_for(SeriesType::FundingRate),
        Some(1_700_000_000_000)
    );
    assert_eq!(record.timestamp_for(SeriesType::OpenInterest), None);
}

#[test]
fn raw_record_rejects_non_integral_timestamps() {
    let stringly = RawRecord::new(json!({"timestamp": "1700000000000"}));
    let fractional = RawRecord::new(json!({"timestamp": 1.5}));
    let integral_float = RawRecord::new(json!({"timestamp": 1_700_000_000_000.0}));
    assert_eq!(stringly.timestamp_for(SeriesType::TakerVolume), None);
    assert_eq!(fractional.timestamp_for(SeriesType::TakerVolume), None);
    assert_eq!(
        integral_float.timestamp_for(SeriesType::TakerVolume),
        Some(1_700_000_000_000)
    );
}

#[test]
fn status_error_includes_upstream_message() {
    let with_msg = PerpetuaError::status(400, Some("Invalid symbol.".into()));
    assert_eq!(
        with_msg.to_string(),
        "upstream returned HTTP 400, expected 200: Invalid symbol."
    );
    let bare = PerpetuaError::status(503, None);
    assert_eq!(bare.to_string(), "upstream returned HTTP 503, expected 200");
    assert_eq!(bare.http_status(), 500);
    assert_eq!(PerpetuaError::validation("x").http_status(), 400);
}

#[test]
fn envelope_omits_data_and_meta_on_failure() {
    let body = ApiResponse::failure("bad", None);
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json, json!({"success": false, "message": "bad", "details": null}));
}

#[test]
fn envelope_meta_is_camel_case() {
    let meta = ApiMeta {
        data_type: "openInterest".into(),
        period: Some("5m".into()),
        start_time: 1,
        end_time: 2,
        requested_end_date: "1970-01-01".into(),
        record_count: 0,
        total_unique_records_fetched: 0,
    };
    let json = serde_json::to_value(ApiResponse::ok(vec![], meta)).unwrap();
    assert_eq!(json["meta"]["dataType"], "openInterest");
    assert_eq!(json["meta"]["recordCount"], 0);
    assert_eq!(json["meta"]["totalUniqueRecordsFetched"], 0);
    assert_eq!(json["meta"]["requestedEndDate"], "1970-01-01");
    assert_eq!(json["data"], json!([]));
}
