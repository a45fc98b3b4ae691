//! App lifecycle: signal trapping, named shutdown actions with per-action
//! timeouts, LIFO graceful shutdown under a global budget, aggregated failure
//! reporting, and K8s readiness/liveness probes.
//!
//! Subsystems register a teardown closure as they come up; on SIGINT/SIGTERM
//! (or a programmatic trigger) the orchestrator runs the closures exactly once,
//! in reverse registration order, each bounded by the smaller of its own
//! timeout and the remaining global budget. Failures never abort the sequence;
//! they are collected into a [`ShutdownReport`] that maps to the process exit
//! code.

mod action;
mod error;
mod metrics;
mod orchestrator;
mod probes;
mod signals;

pub use action::ShutdownAction;
pub use error::{RegisterError, ShutdownError, ShutdownReport};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use probes::{LivenessHandler, ReadinessHandler};
