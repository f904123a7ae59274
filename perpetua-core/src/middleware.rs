//! Middleware trait for wrapping `UpstreamClient` implementations.

use std::sync::Arc;

use crate::connector::UpstreamClient;

/// Trait implemented by client middleware layers.
///
/// A middleware consumes an inner `UpstreamClient` and returns a wrapped client
/// that augments its behavior (e.g., call pacing).
pub trait Middleware: Send + Sync {
    /// Apply this middleware to wrap an inner client and return the wrapped client.
    fn apply(self: Box<Self>, inner: Arc<dyn UpstreamClient>) -> Arc<dyn UpstreamClient>;

    /// Human-readable middleware name for introspection/logging.
    fn name(&self) -> &'static str;

    /// Opaque configuration snapshot for serialization/inspection.
    fn config_json(&self) -> serde_json::Value;
}
