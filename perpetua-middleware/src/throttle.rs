//! Call pacing for outbound upstream requests.
//!
//! A single [`RateThrottle`] is shared by every client of the process. Calls
//! queue on a fair async mutex, so they are admitted in the order they were
//! submitted, and each admission waits until both the minimum spacing and the
//! per-window budget allow it. The throttle only adds latency: the wrapped
//! call's result is returned untouched.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use perpetua_core::{
    Batch, BatchQuery, Middleware, PerpetuaError, SeriesType, ThrottleConfig, UpstreamClient,
};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Shared pacing state for upstream calls.
pub struct RateThrottle {
    config: ThrottleConfig,
    runtime: Mutex<ThrottleRuntime>,
}

struct ThrottleRuntime {
    last_admitted: Option<Instant>,
    window_start: Instant,
    admitted_in_window: u64,
}

impl ThrottleRuntime {
    // Align the window start to regular boundaries even after idle gaps.
    fn roll_window(&mut self, now: Instant, window: Duration) {
        if window.is_zero() {
            return;
        }
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= window {
            let windows_passed = elapsed.as_nanos() / window.as_nanos();
            let boundary_offset = Duration::from_nanos(
                (windows_passed * window.as_nanos())
                    .try_into()
                    .unwrap_or(u64::MAX),
            );
            self.window_start += boundary_offset;
            self.admitted_in_window = 0;
        }
    }
}

impl RateThrottle {
    /// Create a throttle with the given pacing policy.
    #[must_use]
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            runtime: Mutex::new(ThrottleRuntime {
                last_admitted: None,
                window_start: Instant::now(),
                admitted_in_window: 0,
            }),
        }
    }

    /// Create a shareable throttle.
    #[must_use]
    pub fn shared(config: ThrottleConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Pacing policy in effect.
    #[must_use]
    pub const fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    /// Wait until the next call may be issued and record its admission.
    ///
    /// Returns how long the caller was held back by the pacing policy.
    pub async fn acquire(&self) -> Duration {
        let mut rt = self.runtime.lock().await;
        let requested = Instant::now();
        rt.roll_window(requested, self.config.window);

        let mut ready_at = requested;
        if let Some(last) = rt.last_admitted {
            let next = last.checked_add(self.config.min_interval).unwrap_or(last);
            ready_at = ready_at.max(next);
        }
        let limit = self.config.limit.max(1);
        if !self.config.window.is_zero() && rt.admitted_in_window >= limit {
            let next = rt
                .window_start
                .checked_add(self.config.window)
                .unwrap_or(rt.window_start);
            ready_at = ready_at.max(next);
        }

        if ready_at > requested {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                delay_ms = millis(ready_at - requested),
                admitted_in_window = rt.admitted_in_window,
                "throttling upstream call"
            );
            tokio::time::sleep_until(ready_at).await;
        }

        let admitted = Instant::now();
        rt.roll_window(admitted, self.config.window);
        rt.admitted_in_window += 1;
        rt.last_admitted = Some(admitted);
        drop(rt);
        admitted.duration_since(requested)
    }

    /// Admit `fut` through the throttle and await it.
    pub async fn run<T, Fut>(&self, fut: Fut) -> T
    where
        Fut: core::future::Future<Output = T>,
    {
        self.acquire().await;
        fut.await
    }
}

/// Client wrapper that passes every call through a [`RateThrottle`].
pub struct ThrottledClient {
    inner: Arc<dyn UpstreamClient>,
    throttle: Arc<RateThrottle>,
}

impl ThrottledClient {
    /// Wrap `inner` so its calls are paced by `throttle`.
    #[must_use]
    pub fn new(inner: Arc<dyn UpstreamClient>, throttle: Arc<RateThrottle>) -> Self {
        Self { inner, throttle }
    }

    /// Access the inner client.
    #[must_use]
    pub const fn inner(&self) -> &Arc<dyn UpstreamClient> {
        &self.inner
    }

    /// Access the shared throttle.
    #[must_use]
    pub const fn throttle(&self) -> &Arc<RateThrottle> {
        &self.throttle
    }
}

#[async_trait]
impl UpstreamClient for ThrottledClient {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch_batch(
        &self,
        series: SeriesType,
        query: BatchQuery,
    ) -> Result<Batch, PerpetuaError> {
        self.throttle
            .run(self.inner.fetch_batch(series, query))
            .await
    }
}

/// Middleware config for constructing a [`ThrottledClient`].
pub struct ThrottleMiddleware {
    throttle: Arc<RateThrottle>,
}

impl ThrottleMiddleware {
    /// Middleware owning a fresh throttle built from `config`.
    #[must_use]
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            throttle: RateThrottle::shared(config),
        }
    }

    /// Middleware reusing an existing throttle, shared with other clients.
    #[must_use]
    pub const fn with_throttle(throttle: Arc<RateThrottle>) -> Self {
        Self { throttle }
    }
}

impl Middleware for ThrottleMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn UpstreamClient>) -> Arc<dyn UpstreamClient> {
        Arc::new(ThrottledClient::new(inner, self.throttle))
    }

    fn name(&self) -> &'static str {
        "ThrottledClient"
    }

    fn config_json(&self) -> serde_json::Value {
        let cfg = self.throttle.config();
        serde_json::json!({
            "min_interval_ms": millis(cfg.min_interval),
            "limit": cfg.limit,
            "window_ms": millis(cfg.window),
        })
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
