//! Process-wide, single-assignment registry for the active providers.
//!
//! Application code fetches instrumentation through [`tracer`] and [`meter`]
//! instead of threading provider handles through every call site. Both
//! accessors go through the opentelemetry globals, which hand out functioning
//! no-op implementations until [`initialize`] has run — call sites never need
//! a null check and never panic, even after a failed initialisation.

use once_cell::sync::OnceCell;
use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::metrics::Meter;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::{info, warn};

struct Registry {
    service_name: String,
    service_version: String,
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    logger_provider: SdkLoggerProvider,
}

static REGISTRY: OnceCell<Registry> = OnceCell::new();

/// Publish the active providers globally. Effective at most once per process;
/// repeated calls are no-ops with a warning.
pub fn initialize(
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    logger_provider: SdkLoggerProvider,
    service_name: &str,
    service_version: &str,
) {
    let registry = Registry {
        service_name: service_name.to_string(),
        service_version: service_version.to_string(),
        tracer_provider,
        meter_provider,
        logger_provider,
    };
    if REGISTRY.set(registry).is_err() {
        warn!("telemetry registry already initialized, ignoring repeated initialization");
        return;
    }
    let registry = REGISTRY.get().expect("registry was just set");
    global::set_tracer_provider(registry.tracer_provider.clone());
    global::set_meter_provider(registry.meter_provider.clone());
    info!(
        service_name = %registry.service_name,
        service_version = %registry.service_version,
        "telemetry registry initialized"
    );
}

/// True once [`initialize`] has run.
pub fn is_initialized() -> bool {
    REGISTRY.get().is_some()
}

/// Tracer for the given instrumentation scope; a no-op tracer before
/// [`initialize`] and after provider shutdown.
pub fn tracer(scope: &'static str) -> BoxedTracer {
    global::tracer(scope)
}

/// Meter for the given instrumentation scope; a no-op meter before
/// [`initialize`] and after provider shutdown.
pub fn meter(scope: &'static str) -> Meter {
    global::meter(scope)
}

/// The active logger provider, for wiring additional log bridges. Log records
/// themselves flow through the `tracing` facade, which is a functioning no-op
/// before initialisation.
pub fn logger_provider() -> Option<&'static SdkLoggerProvider> {
    REGISTRY.get().map(|r| &r.logger_provider)
}

/// Service name recorded at initialisation, if any.
pub fn service_name() -> Option<&'static str> {
    REGISTRY.get().map(|r| r.service_name.as_str())
}

/// Service version recorded at initialisation, if any.
pub fn service_version() -> Option<&'static str> {
    REGISTRY.get().map(|r| r.service_version.as_str())
}
