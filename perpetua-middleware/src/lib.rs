//! perpetua-middleware
//!
//! Client wrappers that sit between the range fetcher and the raw upstream
//! binding. The throttle here is the one piece of process-lifetime shared
//! state: build it once and hand the same `Arc` to every client.

mod builder;
mod throttle;

pub use crate::builder::ClientBuilder;
pub use crate::throttle::{RateThrottle, ThrottleMiddleware, ThrottledClient};
