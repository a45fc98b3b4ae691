//! tracing-subscriber wiring: stdout, OTLP spans, and OTLP logs.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use telemetry::TelemetryGuard;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Instantiate tracing outputs:
///   - stdout with a level configured by the RUST_LOG envvar (default from
///     config)
///   - an OpenTelemetry span layer over the tracer provider
///   - an OTLP log bridge over the logger provider, with the export plumbing
///     crates silenced so a failing exporter cannot feed its own error logs
///     back into the export pipeline
pub fn init_tracing(log_level: Level, guard: &TelemetryGuard) {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(log_level).into())
            .from_env_lossy(),
    );

    let tracer = guard.tracer_provider().tracer("product-service");
    let otel_layer =
        OpenTelemetryLayer::new(tracer).with_filter(LevelFilter::from_level(log_level));

    let bridge_filter = EnvFilter::new("info")
        .add_directive("opentelemetry=off".parse().unwrap())
        .add_directive("tonic=off".parse().unwrap())
        .add_directive("h2=off".parse().unwrap())
        .add_directive("hyper=off".parse().unwrap());
    let log_layer =
        OpenTelemetryTracingBridge::new(guard.logger_provider()).with_filter(bridge_filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(log_layer)
        .init();
}
