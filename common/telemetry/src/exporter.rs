//! OTLP/gRPC exporter factories, one per signal.
//!
//! Each factory opens a tonic channel to the collector endpoint and wraps it
//! in a signal-specific exporter. Failures name the signal and endpoint; retry
//! policy belongs to the caller, never here.

use tonic::transport::ClientTlsConfig;
use opentelemetry_otlp::{
    LogExporter, MetricExporter, SpanExporter, WithExportConfig, WithTonicConfig,
};
use tonic::metadata::{MetadataKey, MetadataMap, MetadataValue};
use tracing::warn;

use crate::error::{Signal, TelemetryError};
use crate::settings::TelemetrySettings;

/// Ensure the endpoint carries a scheme; the insecure flag decides plaintext
/// versus TLS for scheme-less host:port values.
fn normalized_endpoint(settings: &TelemetrySettings) -> String {
    let endpoint = settings.endpoint.trim();
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else if settings.insecure {
        format!("http://{endpoint}")
    } else {
        format!("https://{endpoint}")
    }
}

fn metadata(headers: &[(String, String)]) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    for (key, value) in headers {
        match (
            key.parse::<MetadataKey<_>>(),
            value.parse::<MetadataValue<_>>(),
        ) {
            (Ok(k), Ok(v)) => {
                metadata.insert(k, v);
            }
            _ => warn!(header = %key, "skipping OTLP header with invalid key or value"),
        }
    }
    metadata
}

pub(crate) fn span_exporter(settings: &TelemetrySettings) -> Result<SpanExporter, TelemetryError> {
    let endpoint = normalized_endpoint(settings);
    let mut builder = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .with_timeout(settings.export_timeout);
    if !settings.headers.is_empty() {
        builder = builder.with_metadata(metadata(&settings.headers));
    }
    if !settings.insecure {
        builder = builder.with_tls_config(ClientTlsConfig::new().with_native_roots());
    }
    builder.build().map_err(|source| TelemetryError::Exporter {
        signal: Signal::Trace,
        endpoint,
        source,
    })
}

pub(crate) fn metric_exporter(
    settings: &TelemetrySettings,
) -> Result<MetricExporter, TelemetryError> {
    let endpoint = normalized_endpoint(settings);
    let mut builder = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .with_timeout(settings.export_timeout);
    if !settings.headers.is_empty() {
        builder = builder.with_metadata(metadata(&settings.headers));
    }
    if !settings.insecure {
        builder = builder.with_tls_config(ClientTlsConfig::new().with_native_roots());
    }
    builder.build().map_err(|source| TelemetryError::Exporter {
        signal: Signal::Metric,
        endpoint,
        source,
    })
}

pub(crate) fn log_exporter(settings: &TelemetrySettings) -> Result<LogExporter, TelemetryError> {
    let endpoint = normalized_endpoint(settings);
    let mut builder = LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .with_timeout(settings.export_timeout);
    if !settings.headers.is_empty() {
        builder = builder.with_metadata(metadata(&settings.headers));
    }
    if !settings.insecure {
        builder = builder.with_tls_config(ClientTlsConfig::new().with_native_roots());
    }
    builder.build().map_err(|source| TelemetryError::Exporter {
        signal: Signal::Log,
        endpoint,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: &str, insecure: bool) -> TelemetrySettings {
        TelemetrySettings {
            endpoint: endpoint.to_string(),
            insecure,
            ..TelemetrySettings::default()
        }
    }

    #[test]
    fn schemeless_endpoint_gets_scheme_from_insecure_flag() {
        assert_eq!(
            normalized_endpoint(&settings("collector:4317", true)),
            "http://collector:4317"
        );
        assert_eq!(
            normalized_endpoint(&settings("collector:4317", false)),
            "https://collector:4317"
        );
    }

    #[test]
    fn explicit_scheme_is_preserved() {
        assert_eq!(
            normalized_endpoint(&settings("http://collector:4317", false)),
            "http://collector:4317"
        );
    }

    #[test]
    fn invalid_header_keys_are_skipped() {
        let map = metadata(&[
            ("x-team".to_string(), "checkout".to_string()),
            ("bad header".to_string(), "value".to_string()),
        ]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("x-team").unwrap().to_str().unwrap(), "checkout");
    }
}
