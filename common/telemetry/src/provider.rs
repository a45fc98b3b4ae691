//! Provider builders: wrap each signal's exporter in its batching machinery.

use opentelemetry_otlp::{LogExporter, MetricExporter, SpanExporter};
use opentelemetry_sdk::logs::{
    BatchConfigBuilder as LogBatchConfigBuilder, BatchLogProcessor, SdkLoggerProvider,
};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{
    BatchConfigBuilder, BatchSpanProcessor, RandomIdGenerator, Sampler, SdkTracerProvider,
};
use opentelemetry_sdk::Resource;

use crate::settings::{SamplerKind, TelemetrySettings};

pub(crate) fn sampler(settings: &TelemetrySettings) -> Sampler {
    match settings.sampler {
        SamplerKind::AlwaysOn => Sampler::AlwaysOn,
        SamplerKind::AlwaysOff => Sampler::AlwaysOff,
        SamplerKind::TraceIdRatio => Sampler::TraceIdRatioBased(settings.sample_ratio),
        SamplerKind::ParentBasedTraceIdRatio => {
            Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(settings.sample_ratio)))
        }
    }
}

pub(crate) fn tracer_provider(
    settings: &TelemetrySettings,
    resource: Resource,
    exporter: SpanExporter,
) -> SdkTracerProvider {
    let batch_config = BatchConfigBuilder::default()
        .with_max_queue_size(settings.batch.max_queue_size)
        .with_max_export_batch_size(settings.batch.max_export_batch_size)
        .with_scheduled_delay(settings.batch.scheduled_delay)
        .build();
    let span_processor = BatchSpanProcessor::builder(exporter)
        .with_batch_config(batch_config)
        .build();

    SdkTracerProvider::builder()
        .with_span_processor(span_processor)
        .with_id_generator(RandomIdGenerator::default())
        .with_sampler(sampler(settings))
        .with_resource(resource)
        .build()
}

/// The meter provider exports on its own periodic interval, independent of the
/// batch delay used by the trace and log pipelines.
pub(crate) fn meter_provider(
    settings: &TelemetrySettings,
    resource: Resource,
    exporter: MetricExporter,
) -> SdkMeterProvider {
    let reader = PeriodicReader::builder(exporter)
        .with_interval(settings.metric_interval)
        .build();

    SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource)
        .build()
}

pub(crate) fn logger_provider(
    settings: &TelemetrySettings,
    resource: Resource,
    exporter: LogExporter,
) -> SdkLoggerProvider {
    let batch_config = LogBatchConfigBuilder::default()
        .with_max_queue_size(settings.batch.max_queue_size)
        .with_max_export_batch_size(settings.batch.max_export_batch_size)
        .with_scheduled_delay(settings.batch.scheduled_delay)
        .build();
    let log_processor = BatchLogProcessor::builder(exporter)
        .with_batch_config(batch_config)
        .build();

    SdkLoggerProvider::builder()
        .with_log_processor(log_processor)
        .with_resource(resource)
        .build()
}
