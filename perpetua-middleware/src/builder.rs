//! Builder for composing clients with middleware layers.
//!
//! Middleware layers form an "onion" around the raw client:
//!
//! ```text
//! RangeFetcher
//!     ↓
//! Outermost Middleware (added last)
//!     ↓
//! Throttle (paces calls)
//!     ↓
//! Raw Client (e.g., Binance - makes actual API calls)
//! ```
//!
//! The `layers` vector stores middleware in **outermost-first** order, and
//! they are **applied in reverse** during `build()` to construct the nesting.

use std::sync::Arc;

use perpetua_core::{Middleware, ThrottleConfig, UpstreamClient};
use serde_json::json;

use crate::throttle::{RateThrottle, ThrottleMiddleware};

const THROTTLE_LAYER: &str = "ThrottledClient";

/// Generic middleware builder for composing a client with layered wrappers.
pub struct ClientBuilder {
    raw: Arc<dyn UpstreamClient>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl ClientBuilder {
    /// Create a new builder from a raw, unwrapped client.
    #[must_use]
    pub fn new(raw: Arc<dyn UpstreamClient>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the throttle with a fresh one built from `cfg`.
    ///
    /// The throttle is inserted at the outermost position so pacing happens
    /// before any other layer runs.
    #[must_use]
    pub fn with_throttle(self, cfg: &ThrottleConfig) -> Self {
        self.with_layer_replacing(Box::new(ThrottleMiddleware::new(cfg.clone())))
    }

    /// Add or replace the throttle with an existing shared instance.
    ///
    /// Use this when several clients must respect one process-wide budget.
    #[must_use]
    pub fn with_shared_throttle(self, throttle: Arc<RateThrottle>) -> Self {
        self.with_layer_replacing(Box::new(ThrottleMiddleware::with_throttle(throttle)))
    }

    /// Remove the throttle if present.
    #[must_use]
    pub fn without_throttle(mut self) -> Self {
        self.layers.retain(|m| m.name() != THROTTLE_LAYER);
        self
    }

    fn with_layer_replacing(mut self, layer: Box<dyn Middleware>) -> Self {
        let name = layer.name();
        self.layers.retain(|m| m.name() != name);
        self.layers.insert(0, layer);
        self
    }

    /// Names and configuration of the layers, outermost first, raw client last.
    #[must_use]
    pub fn describe(&self) -> Vec<serde_json::Value> {
        let mut out: Vec<serde_json::Value> = self
            .layers
            .iter()
            .map(|l| json!({ "name": l.name(), "config": l.config_json() }))
            .collect();
        out.push(json!({ "name": "RawClient", "config": { "name": self.raw.name() } }));
        out
    }

    /// Build the wrapped client.
    ///
    /// Applies middleware layers innermost first so requests flow from the
    /// outermost layer down to the raw client.
    #[must_use]
    pub fn build(self) -> Arc<dyn UpstreamClient> {
        let mut acc: Arc<dyn UpstreamClient> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }

    /// Add an arbitrary middleware layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }
}
