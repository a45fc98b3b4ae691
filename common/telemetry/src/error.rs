//! Telemetry bootstrap and shutdown error types.

use std::fmt;

use thiserror::Error;

/// The telemetry signal an exporter or provider belongs to; used to name the
/// failing pipeline in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Trace,
    Metric,
    Log,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Trace => write!(f, "trace"),
            Signal::Metric => write!(f, "metric"),
            Signal::Log => write!(f, "log"),
        }
    }
}

/// Errors raised while constructing or tearing down the telemetry pipelines.
///
/// Construction errors are fatal to startup and propagate synchronously to the
/// caller of [`init_telemetry`](crate::init_telemetry); shutdown errors are
/// aggregated so no failure masks another.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// `OTEL_RESOURCE_ATTRIBUTES` contained an entry that is not `key=value`.
    #[error("malformed OTEL_RESOURCE_ATTRIBUTES entry '{entry}': expected key=value")]
    ResourceAttributes { entry: String },

    /// Building the OTLP exporter for one signal failed.
    #[error("failed to build OTLP {signal} exporter for endpoint '{endpoint}': {source}")]
    Exporter {
        signal: Signal,
        endpoint: String,
        #[source]
        source: opentelemetry_otlp::ExporterBuildError,
    },

    /// One or more providers failed to flush or shut down.
    #[error("telemetry shutdown failed: {}", format_failures(.failures))]
    Shutdown {
        failures: Vec<(Signal, opentelemetry_sdk::error::OTelSdkError)>,
    },

    /// The blocking shutdown task was cancelled or panicked.
    #[error("telemetry shutdown task aborted: {0}")]
    ShutdownTask(#[from] tokio::task::JoinError),
}

fn format_failures(failures: &[(Signal, opentelemetry_sdk::error::OTelSdkError)]) -> String {
    failures
        .iter()
        .map(|(signal, err)| format!("{signal}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}
