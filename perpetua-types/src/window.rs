use serde::Serialize;

use crate::PerpetuaError;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Half-open time interval `[start, end)` in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TimeWindow {
    /// Build a window, enforcing `start < end`.
    ///
    /// # Errors
    /// Returns `PerpetuaError::Validation` when `start >= end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, PerpetuaError> {
        if start >= end {
            return Err(PerpetuaError::validation(format!(
                "startTime ({start}) must be less than endTime ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> Timestamp {
        self.start
    }

    /// Exclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether `ts` falls inside `[start, end)`.
    #[must_use]
    pub const fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Window length in milliseconds.
    #[must_use]
    pub const fn len_ms(&self) -> i64 {
        self.end - self.start
    }
}
