//! Per-call query parameters and their period rules.

use serde::{Deserialize, Serialize};

use crate::PerpetuaError;
use perpetua_types::{Period, SeriesType, Timestamp};

/// Parameters for a single upstream page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchQuery {
    /// Page start (`startTime`), always sent.
    pub start: Timestamp,
    /// Optional page end (`endTime`).
    pub end: Option<Timestamp>,
    /// Optional bucket size.
    pub period: Option<Period>,
}

impl BatchQuery {
    /// Query for a single page from `start` with no end and no period.
    #[must_use]
    pub const fn page(start: Timestamp) -> Self {
        Self {
            start,
            end: None,
            period: None,
        }
    }

    /// Query for the range `[start, end]` at an optional period.
    #[must_use]
    pub const fn range(start: Timestamp, end: Timestamp, period: Option<Period>) -> Self {
        Self {
            start,
            end: Some(end),
            period,
        }
    }

    /// Builder-style setter for the period.
    #[must_use]
    pub const fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Resolve the period actually sent upstream for `series`.
    ///
    /// - Funding rates never take a period.
    /// - Other series need a period whenever an end time is given; without
    ///   either, they fall back to [`Period::SMALLEST`].
    ///
    /// # Errors
    /// Returns `PerpetuaError::Validation` when the combination is not allowed.
    pub fn resolve_period(&self, series: SeriesType) -> Result<Option<Period>, PerpetuaError> {
        match (series.requires_period(), self.period, self.end) {
            (false, Some(p), _) => Err(PerpetuaError::validation(format!(
                "period ({p}) is not supported for {series}; the endpoint is implicitly hourly"
            ))),
            (false, None, _) => Ok(None),
            (true, Some(p), _) => Ok(Some(p)),
            (true, None, Some(_)) => Err(PerpetuaError::validation(format!(
                "Period is required when providing an end_time for {series} history."
            ))),
            (true, None, None) => Ok(Some(Period::SMALLEST)),
        }
    }
}
