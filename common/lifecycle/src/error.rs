//! Shutdown error types and the aggregated report returned by the orchestrator.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// A single failure recorded while running the shutdown sequence.
///
/// A timed-out action is reported separately from a functional failure so
/// operators can tell a slow flush from a broken pipeline; both count as
/// failures for the exit code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShutdownError {
    /// The action returned an error of its own.
    #[error("component '{name}' failed during shutdown: {reason}")]
    ActionFailed { name: String, reason: String },

    /// The action did not finish within its allotted slice of the budget.
    #[error("component '{name}' did not shut down within {timeout:?}")]
    ActionTimedOut { name: String, timeout: Duration },

    /// The global budget ran out with actions still pending; they were skipped.
    #[error("shutdown budget of {budget:?} exhausted, skipped: {skipped:?}")]
    BudgetExhausted {
        budget: Duration,
        skipped: Vec<String>,
    },
}

/// Returned by [`Orchestrator::register`](crate::Orchestrator::register) once
/// shutdown has begun. Registering at that point is a programming error, not
/// an operational failure, and is surfaced distinctly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot register component '{name}': shutdown already started")]
pub struct RegisterError {
    pub name: String,
}

/// Outcome of the full shutdown sequence: every recorded failure (empty when
/// all actions succeeded) and the wall-clock time the sequence took.
#[derive(Debug, Clone, Default)]
pub struct ShutdownReport {
    pub errors: Vec<ShutdownError>,
    pub elapsed: Duration,
}

impl ShutdownReport {
    /// True when every registered action ran and succeeded within budget.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Process exit status: 0 for a clean shutdown, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for ShutdownReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "shutdown completed cleanly in {:?}", self.elapsed);
        }
        write!(
            f,
            "shutdown completed with {} failure(s) in {:?}:",
            self.errors.len(),
            self.elapsed
        )?;
        for err in &self.errors {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}
