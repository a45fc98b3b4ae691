//! Guard owning the three signal providers and their background export state.

use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::warn;

use crate::error::{Signal, TelemetryError};

/// Owns the tracer, meter and logger providers constructed by
/// [`init_telemetry`](crate::init_telemetry).
///
/// The guard's [`shutdown`](TelemetryGuard::shutdown) is what gets wrapped
/// into a lifecycle shutdown action: it consumes the guard, so a second call
/// is unrepresentable, and provider use after shutdown degrades to the SDK's
/// no-op behaviour rather than crashing.
pub struct TelemetryGuard {
    pub(crate) tracer_provider: SdkTracerProvider,
    pub(crate) meter_provider: SdkMeterProvider,
    pub(crate) logger_provider: SdkLoggerProvider,
}

impl TelemetryGuard {
    /// The tracer provider, for wiring the tracing-opentelemetry layer.
    pub fn tracer_provider(&self) -> &SdkTracerProvider {
        &self.tracer_provider
    }

    /// The meter provider.
    pub fn meter_provider(&self) -> &SdkMeterProvider {
        &self.meter_provider
    }

    /// The logger provider, for wiring the OTLP log bridge layer.
    pub fn logger_provider(&self) -> &SdkLoggerProvider {
        &self.logger_provider
    }

    /// Best-effort flush of all three pipelines; failures are logged, not
    /// returned. Shutdown performs its own final flush.
    pub fn force_flush(&self) {
        if let Err(err) = self.tracer_provider.force_flush() {
            warn!(error = %err, "failed to flush tracer provider");
        }
        if let Err(err) = self.meter_provider.force_flush() {
            warn!(error = %err, "failed to flush meter provider");
        }
        if let Err(err) = self.logger_provider.force_flush() {
            warn!(error = %err, "failed to flush logger provider");
        }
    }

    /// Stop accepting telemetry, flush queued items and release the exporter
    /// transports: logger first, then meter, then tracer, so the trace
    /// pipeline outlives everything that might still emit spans.
    ///
    /// Every provider gets its turn even if an earlier one fails; all failures
    /// are aggregated into one [`TelemetryError::Shutdown`]. The SDK's
    /// blocking shutdown runs on the blocking pool so the caller's deadline
    /// (enforced by the lifecycle orchestrator) can cut it off cleanly.
    pub async fn shutdown(self) -> Result<(), TelemetryError> {
        let TelemetryGuard {
            tracer_provider,
            meter_provider,
            logger_provider,
        } = self;

        tokio::task::spawn_blocking(move || {
            let mut failures = Vec::new();
            if let Err(err) = logger_provider.shutdown() {
                failures.push((Signal::Log, err));
            }
            if let Err(err) = meter_provider.shutdown() {
                failures.push((Signal::Metric, err));
            }
            if let Err(err) = tracer_provider.shutdown() {
                failures.push((Signal::Trace, err));
            }
            if failures.is_empty() {
                Ok(())
            } else {
                Err(TelemetryError::Shutdown { failures })
            }
        })
        .await?
    }
}
