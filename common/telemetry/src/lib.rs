//! Telemetry bootstrap: resource description, OTLP/gRPC exporters, batching
//! providers for traces, metrics and logs, and a one-shot global registry.
//!
//! [`init_telemetry`] runs the startup chain in dependency order — resource,
//! propagator, exporters, providers, registry — and returns a
//! [`TelemetryGuard`] whose `shutdown` tears everything down in reverse.
//! Construction errors abort startup synchronously; nothing is registered
//! globally until every exporter has been built.

mod error;
mod exporter;
mod guard;
mod provider;
pub mod registry;
mod resource;
mod settings;

use opentelemetry::global;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing::info;

pub use error::{Signal, TelemetryError};
pub use guard::TelemetryGuard;
pub use resource::build_resource;
pub use settings::{BatchSettings, SamplerKind, TelemetrySettings};

/// Construct the full telemetry stack from validated settings.
///
/// Exporters for all three signals are built before any provider, so a dial
/// or configuration failure surfaces here with nothing to unwind — no
/// background export work has started yet. On success the providers are
/// published through the global [`registry`] and the guard is returned for
/// lifecycle registration.
pub fn init_telemetry(settings: &TelemetrySettings) -> Result<TelemetryGuard, TelemetryError> {
    let resource = build_resource(&settings.service_name, &settings.service_version)?;

    global::set_text_map_propagator(TraceContextPropagator::new());

    let span_exporter = exporter::span_exporter(settings)?;
    let metric_exporter = exporter::metric_exporter(settings)?;
    let log_exporter = exporter::log_exporter(settings)?;

    let tracer_provider = provider::tracer_provider(settings, resource.clone(), span_exporter);
    let meter_provider = provider::meter_provider(settings, resource.clone(), metric_exporter);
    let logger_provider = provider::logger_provider(settings, resource, log_exporter);

    registry::initialize(
        tracer_provider.clone(),
        meter_provider.clone(),
        logger_provider.clone(),
        &settings.service_name,
        &settings.service_version,
    );
    info!(
        endpoint = %settings.endpoint,
        service_name = %settings.service_name,
        "telemetry pipelines initialized"
    );

    Ok(TelemetryGuard {
        tracer_provider,
        meter_provider,
        logger_provider,
    })
}
