//! Resource descriptor construction.

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;

use crate::error::TelemetryError;

/// Build the immutable attribute set describing this process: service identity
/// plus host/OS attributes derived from the environment. Pure aside from
/// environment reads; never touches the network.
///
/// `OTEL_RESOURCE_ATTRIBUTES` is merged by the SDK's environment detector, but
/// its syntax is validated here first so a malformed entry produces a
/// descriptive error instead of a silently truncated resource.
pub fn build_resource(
    service_name: &str,
    service_version: &str,
) -> Result<Resource, TelemetryError> {
    if let Ok(raw) = std::env::var("OTEL_RESOURCE_ATTRIBUTES") {
        validate_resource_attributes(&raw)?;
    }

    let mut attributes = vec![
        KeyValue::new("service.version", service_version.to_string()),
        KeyValue::new("os.type", std::env::consts::OS),
    ];
    if let Ok(host) = std::env::var("HOSTNAME") {
        if !host.is_empty() {
            attributes.push(KeyValue::new("host.name", host));
        }
    }

    Ok(Resource::builder()
        .with_service_name(service_name.to_string())
        .with_attributes(attributes)
        .build())
}

/// Check every comma-separated entry is `key=value` with a non-empty key.
fn validate_resource_attributes(raw: &str) -> Result<(), TelemetryError> {
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((key, _)) if !key.trim().is_empty() => {}
            _ => {
                return Err(TelemetryError::ResourceAttributes {
                    entry: entry.to_string(),
                })
            }
        }
    }
    Ok(())
}
