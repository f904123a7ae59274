use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the perpetua workspace.
///
/// Caller mistakes are reported as `Validation`; everything the upstream does
/// wrong is one of the `Upstream*` variants. A single upstream failure is fatal
/// to the request that observed it; nothing in the workspace retries.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PerpetuaError {
    /// Bad or missing request parameters.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The upstream call produced no usable response object.
    #[error("upstream returned an invalid response object: {msg}")]
    UpstreamTransport {
        /// Human-readable description of the transport failure.
        msg: String,
    },

    /// The upstream answered with a non-success status code.
    #[error("upstream returned HTTP {status}, expected 200{}", message_suffix(.message))]
    UpstreamStatus {
        /// Status code reported by the upstream.
        status: u16,
        /// The upstream's own error message, when the error envelope carried one.
        message: Option<String>,
    },

    /// The payload did not have the expected shape.
    #[error("upstream returned an invalid series of records: {0}")]
    UpstreamFormat(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl PerpetuaError {
    /// Helper: build a `Validation` error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Helper: build an `UpstreamTransport` error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::UpstreamTransport { msg: msg.into() }
    }

    /// Helper: build an `UpstreamStatus` error.
    #[must_use]
    pub const fn status(status: u16, message: Option<String>) -> Self {
        Self::UpstreamStatus { status, message }
    }

    /// Helper: build an `UpstreamFormat` error.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::UpstreamFormat(msg.into())
    }

    /// Returns true if the caller supplied bad input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if the error originated at the upstream.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTransport { .. }
                | Self::UpstreamStatus { .. }
                | Self::UpstreamFormat(_)
        )
    }

    /// HTTP status a transport layer should answer with for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        if self.is_validation() { 400 } else { 500 }
    }
}
