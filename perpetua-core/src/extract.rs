//! Record extraction strategy selected by series type.
//!
//! Every series carries exactly one timestamp field and a fixed set of metric
//! fields. A [`RecordExtractor`] bundles the timestamp accessor with the
//! normalizer for one series so the fetch loop and merger stay series-agnostic.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::PerpetuaError;
use perpetua_types::{NormalizedRecord, RawRecord, SeriesType, Timestamp};

/// Launch instant of the futures venue; funding rate history begins here.
pub const FUNDING_RATE_GENESIS_MS: Timestamp = 1_568_102_400_000;

/// Lookback used for period series when a dataset has no prior output.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

type TimestampFn = fn(&RawRecord) -> Option<Timestamp>;
type NormalizeFn = fn(&RawRecord) -> Result<NormalizedRecord, PerpetuaError>;

/// Timestamp accessor and normalizer pair for one series.
#[derive(Clone, Copy)]
pub struct RecordExtractor {
    series: SeriesType,
    timestamp: TimestampFn,
    normalize: NormalizeFn,
}

impl std::fmt::Debug for RecordExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordExtractor")
            .field("series", &self.series)
            .finish_non_exhaustive()
    }
}

impl RecordExtractor {
    /// Extractor for `series`.
    #[must_use]
    pub fn for_series(series: SeriesType) -> Self {
        let (timestamp, normalize): (TimestampFn, NormalizeFn) = match series {
            SeriesType::FundingRate => (
                funding_time as TimestampFn,
                normalize_funding_rate as NormalizeFn,
            ),
            SeriesType::OpenInterest => (bucket_time, normalize_open_interest),
            SeriesType::LongShortRatio => (bucket_time, normalize_long_short_ratio),
            SeriesType::TakerVolume => (bucket_time, normalize_taker_volume),
        };
        Self {
            series,
            timestamp,
            normalize,
        }
    }

    /// Series this extractor handles.
    #[must_use]
    pub const fn series(&self) -> SeriesType {
        self.series
    }

    /// Read the record's timestamp, or `None` if it is missing or not numeric.
    #[must_use]
    pub fn timestamp(&self, record: &RawRecord) -> Option<Timestamp> {
        (self.timestamp)(record)
    }

    /// Convert the record into its typed, rounded form.
    ///
    /// # Errors
    /// Returns `PerpetuaError::UpstreamFormat` if the timestamp or any metric
    /// field is missing or unparsable.
    pub fn normalize(&self, record: &RawRecord) -> Result<NormalizedRecord, PerpetuaError> {
        (self.normalize)(record)
    }

    /// First timestamp a dataset for this series should request when empty.
    #[must_use]
    pub const fn genesis_timestamp(&self, now: Timestamp) -> Timestamp {
        match self.series {
            SeriesType::FundingRate => FUNDING_RATE_GENESIS_MS,
            _ => now.saturating_sub(DEFAULT_LOOKBACK_DAYS * 24 * 60 * 60 * 1000),
        }
    }
}

fn funding_time(record: &RawRecord) -> Option<Timestamp> {
    record.timestamp_for(SeriesType::FundingRate)
}

fn bucket_time(record: &RawRecord) -> Option<Timestamp> {
    record.timestamp_for(SeriesType::OpenInterest)
}

fn required_timestamp(record: &RawRecord, series: SeriesType) -> Result<Timestamp, PerpetuaError> {
    record.timestamp_for(series).ok_or_else(|| {
        PerpetuaError::format(format!(
            "{series} record has no numeric `{}` field",
            series.timestamp_field()
        ))
    })
}

/// Read a decimal field (JSON string or number) rounded to `dp` places.
fn decimal_field(record: &RawRecord, name: &str, dp: u32) -> Result<Decimal, PerpetuaError> {
    let parsed = match record.field(name) {
        Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        _ => None,
    };
    parsed
        .map(|d| d.round_dp(dp))
        .ok_or_else(|| PerpetuaError::format(format!("field `{name}` is missing or not a number")))
}

fn normalize_funding_rate(record: &RawRecord) -> Result<NormalizedRecord, PerpetuaError> {
    Ok(NormalizedRecord::FundingRate {
        timestamp: required_timestamp(record, SeriesType::FundingRate)?,
        funding_rate: decimal_field(record, "fundingRate", 8)?,
    })
}

fn normalize_open_interest(record: &RawRecord) -> Result<NormalizedRecord, PerpetuaError> {
    Ok(NormalizedRecord::OpenInterest {
        timestamp: required_timestamp(record, SeriesType::OpenInterest)?,
        sum_open_interest: decimal_field(record, "sumOpenInterest", 8)?,
        sum_open_interest_value: decimal_field(record, "sumOpenInterestValue", 8)?,
    })
}

fn normalize_long_short_ratio(record: &RawRecord) -> Result<NormalizedRecord, PerpetuaError> {
    Ok(NormalizedRecord::LongShortRatio {
        timestamp: required_timestamp(record, SeriesType::LongShortRatio)?,
        long_account: decimal_field(record, "longAccount", 4)?,
        short_account: decimal_field(record, "shortAccount", 4)?,
        long_short_ratio: decimal_field(record, "longShortRatio", 4)?,
    })
}

fn normalize_taker_volume(record: &RawRecord) -> Result<NormalizedRecord, PerpetuaError> {
    Ok(NormalizedRecord::TakerVolume {
        timestamp: required_timestamp(record, SeriesType::TakerVolume)?,
        buy_vol: decimal_field(record, "buyVol", 4)?,
        sell_vol: decimal_field(record, "sellVol", 4)?,
        buy_sell_ratio: decimal_field(record, "buySellRatio", 4)?,
    })
}
