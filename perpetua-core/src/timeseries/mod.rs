//! Time-series utilities shared by clients and the orchestrator.
//!
//! - `merge`: deduplicate and order collected pages by timestamp
/// Merge utilities for joining paged series.
pub mod merge;
