use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use perpetua_core::{Batch, BatchQuery, PerpetuaError, SeriesType, UpstreamClient};

/// Instruction for how the next call should behave.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(PerpetuaError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    script: VecDeque<MockBehavior<Batch>>,
    fallback: Option<MockBehavior<Batch>>,
    calls: Vec<(SeriesType, BatchQuery)>,
}

/// Controller handle used by tests to drive the scripted upstream from the outside.
pub struct ScriptController {
    state: Arc<Mutex<InternalState>>,
}

impl ScriptController {
    /// Queue the behavior of the next unscripted call.
    pub async fn push_behavior(&self, behavior: MockBehavior<Batch>) {
        let mut guard = self.state.lock().await;
        guard.script.push_back(behavior);
    }

    /// Queue one `Return` per batch, answered in order.
    pub async fn push_batches<I>(&self, batches: I)
    where
        I: IntoIterator<Item = Batch>,
    {
        let mut guard = self.state.lock().await;
        guard
            .script
            .extend(batches.into_iter().map(MockBehavior::Return));
    }

    /// Behavior used once the script runs dry. Defaults to an empty batch.
    pub async fn set_fallback(&self, behavior: MockBehavior<Batch>) {
        let mut guard = self.state.lock().await;
        guard.fallback = Some(behavior);
    }

    /// Return a copy of the call log, in call order.
    pub async fn calls(&self) -> Vec<(SeriesType, BatchQuery)> {
        let guard = self.state.lock().await;
        guard.calls.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        let guard = self.state.lock().await;
        guard.calls.len()
    }

    /// Clear the script, fallback and call log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.script.clear();
        guard.fallback = None;
        guard.calls.clear();
    }
}

/// An upstream client that answers from a script fed by an external controller.
pub struct ScriptedUpstream {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl ScriptedUpstream {
    /// Create a new scripted upstream and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn UpstreamClient>, ScriptController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = ScriptController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn UpstreamClient>, controller)
    }
}

#[async_trait]
impl UpstreamClient for ScriptedUpstream {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_batch(
        &self,
        series: SeriesType,
        query: BatchQuery,
    ) -> Result<Batch, PerpetuaError> {
        // Log and pop without holding the lock across the hang
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.push((series, query));
            guard
                .script
                .pop_front()
                .or_else(|| guard.fallback.clone())
        };

        match behavior {
            Some(MockBehavior::Return(batch)) => Ok(batch),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(Vec::new()),
        }
    }
}
