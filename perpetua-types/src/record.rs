//! Raw upstream records and their normalized dataset form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{SeriesType, Timestamp};

/// One upstream record, kept verbatim so it can be handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    /// Wrap a JSON value received from the upstream.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a top-level field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Read the named field as an integral millisecond timestamp.
    ///
    /// Integral floats are accepted; strings, fractional numbers and missing
    /// fields are not.
    #[must_use]
    pub fn timestamp_at(&self, name: &str) -> Option<Timestamp> {
        let v = self.field(name)?;
        if let Some(ts) = v.as_i64() {
            return Some(ts);
        }
        let f = v.as_f64()?;
        #[allow(clippy::cast_possible_truncation)]
        (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then(|| f as i64)
    }

    /// Read this record's timestamp using the series' timestamp field.
    #[must_use]
    pub fn timestamp_for(&self, series: SeriesType) -> Option<Timestamp> {
        self.timestamp_at(series.timestamp_field())
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Sequence of raw records returned by a single upstream call.
pub type Batch = Vec<RawRecord>;

/// Typed, rounded form of a record as written by dataset builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "series", rename_all = "camelCase")]
#[non_exhaustive]
pub enum NormalizedRecord {
    /// Funding rate sample.
    FundingRate {
        /// Funding time in epoch milliseconds.
        timestamp: Timestamp,
        /// Funding rate, 8 decimal places.
        funding_rate: Decimal,
    },
    /// Open interest sample.
    OpenInterest {
        /// Bucket time in epoch milliseconds.
        timestamp: Timestamp,
        /// Total open interest in contracts, 8 decimal places.
        sum_open_interest: Decimal,
        /// Total open interest in quote value, 8 decimal places.
        sum_open_interest_value: Decimal,
    },
    /// Long/short account ratio sample.
    LongShortRatio {
        /// Bucket time in epoch milliseconds.
        timestamp: Timestamp,
        /// Share of long accounts, 4 decimal places.
        long_account: Decimal,
        /// Share of short accounts, 4 decimal places.
        short_account: Decimal,
        /// Long/short ratio, 4 decimal places.
        long_short_ratio: Decimal,
    },
    /// Taker buy/sell volume sample.
    TakerVolume {
        /// Bucket time in epoch milliseconds.
        timestamp: Timestamp,
        /// Taker buy volume, 4 decimal places.
        buy_vol: Decimal,
        /// Taker sell volume, 4 decimal places.
        sell_vol: Decimal,
        /// Buy/sell ratio, 4 decimal places.
        buy_sell_ratio: Decimal,
    },
}

impl NormalizedRecord {
    /// Timestamp of the sample.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        match self {
            Self::FundingRate { timestamp, .. }
            | Self::OpenInterest { timestamp, .. }
            | Self::LongShortRatio { timestamp, .. }
            | Self::TakerVolume { timestamp, .. } => *timestamp,
        }
    }

    /// Series this sample belongs to.
    #[must_use]
    pub const fn series(&self) -> SeriesType {
        match self {
            Self::FundingRate { .. } => SeriesType::FundingRate,
            Self::OpenInterest { .. } => SeriesType::OpenInterest,
            Self::LongShortRatio { .. } => SeriesType::LongShortRatio,
            Self::TakerVolume { .. } => SeriesType::TakerVolume,
        }
    }
}
