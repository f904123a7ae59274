//! Response envelope returned by the inbound data endpoint.

use serde::{Deserialize, Serialize};

use crate::{RawRecord, Timestamp};

/// Metadata describing a successful range fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeta {
    /// Wire name of the series.
    pub data_type: String,
    /// Reported period; `1h` for funding rates.
    pub period: Option<String>,
    /// Inclusive window start.
    pub start_time: Timestamp,
    /// Exclusive window end.
    pub end_time: Timestamp,
    /// UTC calendar date (`YYYY-MM-DD`) of the last millisecond in the window.
    pub requested_end_date: String,
    /// Records returned after filtering to the window.
    pub record_count: usize,
    /// Unique records collected before the final window filter.
    pub total_unique_records_fetched: usize,
}

/// JSON body of every reply from the data endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Error detail; `null` on validation failures and successes.
    pub details: Option<String>,
    /// Records in ascending timestamp order. Present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<RawRecord>>,
    /// Request metadata. Present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ApiMeta>,
}

impl ApiResponse {
    /// Build a success body.
    #[must_use]
    pub fn ok(data: Vec<RawRecord>, meta: ApiMeta) -> Self {
        Self {
            success: true,
            message: "Data fetched successfully.".to_string(),
            details: None,
            data: Some(data),
            meta: Some(meta),
        }
    }

    /// Build a failure body.
    pub fn failure(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details,
            data: None,
            meta: None,
        }
    }
}
