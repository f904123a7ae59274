//! Perpetua-specific data transfer objects, error taxonomy and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod record;
mod reports;
mod series;
mod window;

pub use config::{BinanceConfig, FetchConfig, ONE_DAY_MS, PerpetuaConfig, ThrottleConfig};
pub use error::PerpetuaError;
pub use record::{Batch, NormalizedRecord, RawRecord};
pub use reports::{ApiMeta, ApiResponse};
pub use series::{Period, SeriesType};
pub use window::{TimeWindow, Timestamp};
