//! Framework-agnostic handler for the `/api/data` read endpoint.
//!
//! Parameters arrive as raw strings; validation happens in a fixed order and
//! never touches the upstream. The reply carries the HTTP status the
//! transport layer should use alongside the JSON body.

use std::str::FromStr;
use std::sync::Arc;

use chrono::DateTime;
use perpetua_core::{
    ApiMeta, ApiResponse, Period, PerpetuaError, SeriesType, TimeWindow, Timestamp,
};
use serde::Deserialize;

use crate::Perpetua;
use crate::fetch::{RangeRequest, RangeResult};

const MISSING_PARAMS: &str = "Missing or invalid required parameters: dataType, startTime, endTime, and period (for non-fundingRate).";
const INVALID_TIMES: &str = "Invalid startTime or endTime. Must be valid timestamps (ms) and startTime must be less than endTime.";

/// Raw query parameters of a data request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    /// Series wire name.
    pub data_type: Option<String>,
    /// Window start in epoch milliseconds.
    pub start_time: Option<String>,
    /// Window end in epoch milliseconds, exclusive.
    pub end_time: Option<String>,
    /// Bucket size, required unless `dataType=fundingRate`.
    pub period: Option<String>,
}

impl DataQuery {
    /// Parse a URL query string such as `dataType=openInterest&startTime=...`.
    ///
    /// A leading `?` is ignored. Unknown keys are skipped; the last
    /// occurrence of a repeated key wins.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut out = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                "dataType" => &mut out.data_type,
                "startTime" => &mut out.start_time,
                "endTime" => &mut out.end_time,
                "period" => &mut out.period,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        out
    }

    fn present(value: Option<&String>) -> Option<&str> {
        value.map(String::as_str).filter(|s| !s.is_empty())
    }

    /// Validate the parameters into a range request.
    ///
    /// # Errors
    /// Returns `Validation` with the message shown to the caller.
    pub fn validate(&self) -> Result<RangeRequest, PerpetuaError> {
        let (Some(data_type), Some(start), Some(end)) = (
            Self::present(self.data_type.as_ref()),
            Self::present(self.start_time.as_ref()),
            Self::present(self.end_time.as_ref()),
        ) else {
            return Err(PerpetuaError::validation(MISSING_PARAMS));
        };
        let period = Self::present(self.period.as_ref());
        if data_type != SeriesType::FundingRate.as_str() && period.is_none() {
            return Err(PerpetuaError::validation(MISSING_PARAMS));
        }

        let window = match (parse_millis(start), parse_millis(end)) {
            (Some(s), Some(e)) => {
                TimeWindow::new(s, e).map_err(|_| PerpetuaError::validation(INVALID_TIMES))?
            }
            _ => return Err(PerpetuaError::validation(INVALID_TIMES)),
        };

        let series = SeriesType::from_str(data_type)?;
        let period = period.map(Period::from_str).transpose()?;
        RangeRequest::new(series, window, period)
    }
}

fn parse_millis(raw: &str) -> Option<Timestamp> {
    raw.trim().parse::<Timestamp>().ok()
}

/// UTC calendar date of the window's last millisecond.
fn requested_end_date(end: Timestamp) -> String {
    DateTime::from_timestamp_millis(end - 1)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Status code and body produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    /// HTTP status for the transport layer.
    pub status: u16,
    /// JSON body.
    pub body: ApiResponse,
}

impl ApiReply {
    fn rejected(err: &PerpetuaError) -> Self {
        let message = match err {
            PerpetuaError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        };
        Self {
            status: 400,
            body: ApiResponse::failure(message, None),
        }
    }
}

/// Request handler backed by a shared orchestrator.
pub struct DataApi {
    perpetua: Arc<Perpetua>,
}

impl DataApi {
    /// Handler over `perpetua`.
    #[must_use]
    pub const fn new(perpetua: Arc<Perpetua>) -> Self {
        Self { perpetua }
    }

    /// Validate, fetch and shape the reply for one request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "perpetua::api::handle",
            skip(self, query),
            fields(data_type = ?query.data_type, period = ?query.period),
        )
    )]
    pub async fn handle(&self, query: &DataQuery) -> ApiReply {
        let request = match query.validate() {
            Ok(r) => r,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::info!(error = %e, "rejected data request");
                return ApiReply::rejected(&e);
            }
        };

        match self.perpetua.fetch(&request).await {
            Ok(result) => {
                let meta = meta_for(&result);
                ApiReply {
                    status: 200,
                    body: ApiResponse::ok(result.records, meta),
                }
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(error = %e, series = %request.series(), "range fetch failed");
                ApiReply {
                    status: e.http_status(),
                    body: ApiResponse::failure(
                        format!(
                            "Failed to fetch data from the upstream API for data type {}.",
                            request.series()
                        ),
                        Some(e.to_string()),
                    ),
                }
            }
        }
    }
}

fn meta_for(result: &RangeResult) -> ApiMeta {
    ApiMeta {
        data_type: result.series.as_str().to_string(),
        period: result
            .series
            .effective_period_label(result.period)
            .map(str::to_string),
        start_time: result.window.start(),
        end_time: result.window.end(),
        requested_end_date: requested_end_date(result.window.end()),
        record_count: result.record_count(),
        total_unique_records_fetched: result.unique_before_filter,
    }
}
