//! Lifecycle orchestrator: registration of named shutdown actions, signal
//! trapping, and the single LIFO shutdown pass under a global budget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::ShutdownAction;
use crate::error::{RegisterError, ShutdownError, ShutdownReport};
use crate::metrics;
use crate::probes::{LivenessHandler, ReadinessHandler};
use crate::signals;

/// Builder for [`Orchestrator`]; use any duration for the global budget.
pub struct OrchestratorBuilder {
    name: String,
    overall_timeout: Duration,
    trap_signals: bool,
}

impl OrchestratorBuilder {
    /// Global ceiling on the whole shutdown sequence. Per-action timeouts are
    /// capped by whatever remains of this budget.
    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = timeout;
        self
    }

    /// Install SIGINT/SIGTERM handlers (default: true). Disable in tests so
    /// the orchestrator only reacts to programmatic triggers.
    pub fn with_trap_signals(mut self, trap: bool) -> Self {
        self.trap_signals = trap;
        self
    }

    pub fn build(self) -> Orchestrator {
        Orchestrator {
            inner: Arc::new(Inner {
                name: self.name,
                overall_timeout: self.overall_timeout,
                trap_signals: self.trap_signals,
                actions: Mutex::new(Vec::new()),
                listening: AtomicBool::new(false),
                shutdown_started: AtomicBool::new(false),
                trigger: CancellationToken::new(),
                done: CancellationToken::new(),
                report: Mutex::new(None),
            }),
        }
    }
}

/// Process-wide shutdown orchestrator.
///
/// Subsystems call [`register`](Orchestrator::register) in startup order;
/// shutdown runs the registered actions in strict reverse order, so the
/// subsystems registered first (telemetry) outlive the ones registered last
/// (the HTTP server) and failures during server drain can still be traced.
///
/// The shutdown sequence runs exactly once per process, no matter how many
/// triggers fire: repeated signals, [`trigger`](Orchestrator::trigger) and
/// [`stop`](Orchestrator::stop) all collapse into the same one-shot gate.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    overall_timeout: Duration,
    trap_signals: bool,
    actions: Mutex<Vec<ShutdownAction>>,
    listening: AtomicBool,
    shutdown_started: AtomicBool,
    trigger: CancellationToken,
    done: CancellationToken,
    report: Mutex<Option<ShutdownReport>>,
}

impl Orchestrator {
    /// Create a builder; `name` labels logs and metrics for this process.
    pub fn builder(name: &str) -> OrchestratorBuilder {
        OrchestratorBuilder {
            name: name.to_string(),
            overall_timeout: Duration::from_secs(30),
            trap_signals: true,
        }
    }

    /// Register a named teardown step. Insertion order is startup order;
    /// shutdown traverses the reverse. `timeout` caps this single step, and is
    /// itself capped by whatever remains of the global budget at run time.
    ///
    /// Returns [`RegisterError`] once shutdown has begun; that is a
    /// programming error and is also logged loudly here so it cannot pass
    /// silently.
    pub fn register<F, Fut>(
        &self,
        name: &str,
        timeout: Duration,
        action: F,
    ) -> Result<(), RegisterError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        if self.inner.shutdown_started.load(Ordering::SeqCst) {
            let err = RegisterError {
                name: name.to_string(),
            };
            tracing::error!(component = %name, "lifecycle: {err}");
            return Err(err);
        }
        let mut actions = self
            .inner
            .actions
            .lock()
            .expect("lifecycle action list lock poisoned");
        debug!(
            component = %name,
            timeout_secs = timeout.as_secs_f64(),
            "lifecycle: component registered"
        );
        actions.push(ShutdownAction::new(name, timeout, action));
        Ok(())
    }

    /// Begin listening for shutdown triggers (signals and programmatic);
    /// non-blocking. Calling more than once is a no-op.
    pub fn start(&self) {
        if self.inner.listening.swap(true, Ordering::SeqCst) {
            warn!("lifecycle: start() called twice, ignoring");
            return;
        }
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let reason = if inner.trap_signals {
                tokio::select! {
                    signal = signals::wait_for_shutdown_signal() => signal,
                    _ = inner.trigger.cancelled() => "trigger",
                }
            } else {
                inner.trigger.cancelled().await;
                "trigger"
            };
            inner.trigger.cancel();
            Inner::run(inner, reason).await;
        });
    }

    /// Programmatic shutdown trigger; returns immediately.
    pub fn trigger(&self) {
        self.inner.trigger.cancel();
    }

    /// Trigger shutdown and block until the sequence completes.
    pub async fn stop(&self) -> ShutdownReport {
        self.inner.trigger.cancel();
        Inner::run(self.inner.clone(), "stop").await;
        self.wait().await
    }

    /// Block until the shutdown sequence completes, then return its report.
    pub async fn wait(&self) -> ShutdownReport {
        self.inner.done.cancelled().await;
        self.inner
            .report
            .lock()
            .expect("lifecycle report lock poisoned")
            .clone()
            .unwrap_or_default()
    }

    /// True once any trigger has fired.
    pub fn is_shutting_down(&self) -> bool {
        self.inner.trigger.is_cancelled()
    }

    /// Future that resolves when shutdown begins; pass to
    /// `axum::serve(...).with_graceful_shutdown(...)` or use in `select!`.
    pub fn shutdown_signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let trigger = self.inner.trigger.clone();
        async move {
            trigger.cancelled().await;
        }
    }

    /// Axum-compatible handler for `/_readiness`; 200 while running, 503 once
    /// shutdown has begun.
    pub fn readiness_handler(&self) -> ReadinessHandler {
        ReadinessHandler::new(self.inner.trigger.clone())
    }

    /// Axum-compatible handler for `/_liveness`; always 200.
    pub fn liveness_handler(&self) -> LivenessHandler {
        LivenessHandler::new()
    }
}

impl Inner {
    /// The single shutdown pass. Guarded by the one-shot flag; every caller
    /// past the first returns immediately and can await completion via `done`.
    async fn run(inner: Arc<Inner>, reason: &str) {
        if inner.shutdown_started.swap(true, Ordering::SeqCst) {
            return;
        }
        metrics::emit_shutdown_initiated(&inner.name, reason);
        info!(trigger_reason = reason, "lifecycle: shutdown initiated");

        // Fresh budget anchored at trigger time, independent of any
        // already-cancelled request context.
        let started = Instant::now();
        let deadline = started + inner.overall_timeout;

        let mut actions = {
            let mut guard = inner
                .actions
                .lock()
                .expect("lifecycle action list lock poisoned");
            std::mem::take(&mut *guard)
        };
        actions.reverse();

        let mut errors = Vec::new();
        let mut queue = actions.into_iter();
        while let Some(action) = queue.next() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                let mut skipped = vec![action.name];
                skipped.extend(queue.by_ref().map(|a| a.name));
                for name in &skipped {
                    metrics::emit_action_result(&inner.name, name, "skipped");
                }
                warn!(
                    budget_secs = inner.overall_timeout.as_secs_f64(),
                    skipped = ?skipped,
                    "lifecycle: shutdown budget exhausted, skipping remaining components"
                );
                errors.push(ShutdownError::BudgetExhausted {
                    budget: inner.overall_timeout,
                    skipped,
                });
                break;
            }

            let ShutdownAction {
                name,
                timeout: action_timeout,
                run,
            } = action;
            let slice = action_timeout.min(remaining);
            info!(
                component = %name,
                timeout_secs = slice.as_secs_f64(),
                "lifecycle: shutting down component"
            );
            let action_start = Instant::now();
            match timeout(slice, run()).await {
                Ok(Ok(())) => {
                    let took = action_start.elapsed();
                    metrics::emit_action_duration(&inner.name, &name, "completed", took.as_secs_f64());
                    metrics::emit_action_result(&inner.name, &name, "completed");
                    info!(
                        component = %name,
                        duration_secs = took.as_secs_f64(),
                        "lifecycle: component shut down"
                    );
                }
                Ok(Err(err)) => {
                    let took = action_start.elapsed();
                    metrics::emit_action_duration(&inner.name, &name, "failed", took.as_secs_f64());
                    metrics::emit_action_result(&inner.name, &name, "failed");
                    warn!(
                        component = %name,
                        duration_secs = took.as_secs_f64(),
                        "lifecycle: component failed during shutdown: {err:#}"
                    );
                    errors.push(ShutdownError::ActionFailed {
                        name,
                        reason: format!("{err:#}"),
                    });
                }
                Err(_) => {
                    metrics::emit_action_duration(&inner.name, &name, "timeout", slice.as_secs_f64());
                    metrics::emit_action_result(&inner.name, &name, "timeout");
                    warn!(
                        component = %name,
                        timeout_secs = slice.as_secs_f64(),
                        "lifecycle: component timed out during shutdown"
                    );
                    errors.push(ShutdownError::ActionTimedOut {
                        name,
                        timeout: slice,
                    });
                }
            }
        }

        let elapsed = started.elapsed();
        let clean = errors.is_empty();
        metrics::emit_shutdown_completed(&inner.name, clean);
        let report = ShutdownReport { errors, elapsed };
        if clean {
            info!(
                total_duration_secs = elapsed.as_secs_f64(),
                "lifecycle: shutdown complete"
            );
        } else {
            warn!(
                total_duration_secs = elapsed.as_secs_f64(),
                "lifecycle: {report}"
            );
        }
        *inner
            .report
            .lock()
            .expect("lifecycle report lock poisoned") = Some(report);
        inner.done.cancel();
    }
}
