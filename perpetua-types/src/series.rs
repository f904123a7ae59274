//! Series and period identifiers shared by every layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PerpetuaError;

/// One of the supported market-metric feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesType {
    /// Funding rate history. Implicitly hourly; takes no period.
    #[serde(rename = "fundingRate")]
    FundingRate,
    /// Aggregated open interest history.
    #[serde(rename = "openInterest")]
    OpenInterest,
    /// Global long/short account ratio.
    #[serde(rename = "longShortRatio")]
    LongShortRatio,
    /// Taker buy/sell volume.
    #[serde(rename = "takerVolume")]
    TakerVolume,
}

impl SeriesType {
    /// Every series, in a stable order.
    pub const ALL: [Self; 4] = [
        Self::FundingRate,
        Self::OpenInterest,
        Self::LongShortRatio,
        Self::TakerVolume,
    ];

    /// Wire name used by the inbound API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FundingRate => "fundingRate",
            Self::OpenInterest => "openInterest",
            Self::LongShortRatio => "longShortRatio",
            Self::TakerVolume => "takerVolume",
        }
    }

    /// Name of the single field that carries a record's timestamp.
    #[must_use]
    pub const fn timestamp_field(self) -> &'static str {
        match self {
            Self::FundingRate => "fundingTime",
            Self::OpenInterest | Self::LongShortRatio | Self::TakerVolume => "timestamp",
        }
    }

    /// Whether callers must supply a period for this series.
    #[must_use]
    pub const fn requires_period(self) -> bool {
        !matches!(self, Self::FundingRate)
    }

    /// Period label reported back to callers.
    ///
    /// Funding rates are always reported as `1h` since the endpoint is hourly.
    #[must_use]
    pub fn effective_period_label(self, period: Option<Period>) -> Option<&'static str> {
        match self {
            Self::FundingRate => Some(Period::H1.as_str()),
            _ => period.map(Period::as_str),
        }
    }
}

impl fmt::Display for SeriesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesType {
    type Err = PerpetuaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|series| series.as_str() == s)
            .ok_or_else(|| {
                PerpetuaError::validation(format!(
                    "Unsupported data type: {s}. Supported types: fundingRate, openInterest, longShortRatio, takerVolume."
                ))
            })
    }
}

/// Upstream-supported bucket sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    /// Five minutes.
    #[serde(rename = "5m")]
    M5,
    /// Fifteen minutes.
    #[serde(rename = "15m")]
    M15,
    /// Thirty minutes.
    #[serde(rename = "30m")]
    M30,
    /// One hour.
    #[serde(rename = "1h")]
    H1,
    /// Two hours.
    #[serde(rename = "2h")]
    H2,
    /// Four hours.
    #[serde(rename = "4h")]
    H4,
    /// Six hours.
    #[serde(rename = "6h")]
    H6,
    /// Eight hours.
    #[serde(rename = "8h")]
    H8,
    /// Twelve hours.
    #[serde(rename = "12h")]
    H12,
    /// One day.
    #[serde(rename = "1d")]
    D1,
}

impl Period {
    /// Every supported period, shortest first.
    pub const ALL: [Self; 10] = [
        Self::M5,
        Self::M15,
        Self::M30,
        Self::H1,
        Self::H2,
        Self::H4,
        Self::H6,
        Self::H8,
        Self::H12,
        Self::D1,
    ];

    /// Fallback used when neither a period nor an end time is given.
    pub const SMALLEST: Self = Self::M5;

    /// Wire name understood by the upstream.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::H2 => "2h",
            Self::H4 => "4h",
            Self::H6 => "6h",
            Self::H8 => "8h",
            Self::H12 => "12h",
            Self::D1 => "1d",
        }
    }

    /// Bucket length in minutes.
    #[must_use]
    pub const fn minutes(self) -> i64 {
        match self {
            Self::M5 => 5,
            Self::M15 => 15,
            Self::M30 => 30,
            Self::H1 => 60,
            Self::H2 => 120,
            Self::H4 => 240,
            Self::H6 => 360,
            Self::H8 => 480,
            Self::H12 => 720,
            Self::D1 => 1440,
        }
    }

    /// Bucket length in milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.minutes() * 60_000
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = PerpetuaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                PerpetuaError::validation(format!(
                    "Unsupported period: {s}. Supported periods: 5m, 15m, 30m, 1h, 2h, 4h, 6h, 8h, 12h, 1d."
                ))
            })
    }
}
