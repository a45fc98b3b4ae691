//! Registered shutdown actions.

use std::fmt;
use std::time::Duration;

use futures::future::BoxFuture;

pub(crate) type ActionFn = Box<dyn FnOnce() -> BoxFuture<'static, anyhow::Result<()>> + Send>;

/// One registered teardown step: a unique name (used in logs, metrics and the
/// final report), the maximum time the step may run, and the closure itself.
///
/// Immutable once registered and invoked at most once. The orchestrator bounds
/// the closure's future with `min(timeout, remaining global budget)` and drops
/// it at the deadline, so the future must be cancel-safe.
pub struct ShutdownAction {
    pub(crate) name: String,
    pub(crate) timeout: Duration,
    pub(crate) run: ActionFn,
}

impl ShutdownAction {
    pub(crate) fn new<F, Fut>(name: &str, timeout: Duration, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            name: name.to_string(),
            timeout,
            run: Box::new(move || Box::pin(action())),
        }
    }

    /// Name the action was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-action timeout the action was registered with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for ShutdownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownAction")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
