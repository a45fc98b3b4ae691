//! Typed telemetry settings, handed over by the service's config layer after
//! validation. Range and presence checks belong to the config loader; this
//! crate only consumes already-validated values.

use std::time::Duration;

use tracing::warn;

/// Trace sampler selection. Unrecognised configuration strings are not fatal:
/// they degrade to [`SamplerKind::ParentBasedTraceIdRatio`] with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerKind {
    AlwaysOn,
    AlwaysOff,
    TraceIdRatio,
    ParentBasedTraceIdRatio,
}

impl SamplerKind {
    /// Parse a configured sampler name, degrading instead of failing.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "always_on" => SamplerKind::AlwaysOn,
            "always_off" => SamplerKind::AlwaysOff,
            "traceidratio" => SamplerKind::TraceIdRatio,
            "parentbased_traceidratio" => SamplerKind::ParentBasedTraceIdRatio,
            other => {
                warn!(
                    sampler = %other,
                    "unknown sampler type, falling back to parentbased_traceidratio"
                );
                SamplerKind::ParentBasedTraceIdRatio
            }
        }
    }
}

/// Batch processor knobs shared by the trace and log pipelines.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Delay between two consecutive exports of a partially filled batch.
    pub scheduled_delay: Duration,
    pub max_queue_size: usize,
    pub max_export_batch_size: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            scheduled_delay: Duration::from_secs(5),
            max_queue_size: 2048,
            max_export_batch_size: 512,
        }
    }
}

/// Everything needed to bootstrap the trace, metric and log pipelines.
#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub service_name: String,
    pub service_version: String,
    /// OTLP collector endpoint, host:port or full URL.
    pub endpoint: String,
    /// Skip transport authentication (plaintext gRPC) when set.
    pub insecure: bool,
    /// Extra OTLP request headers, already parsed into pairs.
    pub headers: Vec<(String, String)>,
    pub sampler: SamplerKind,
    /// Sampling ratio in [0.0, 1.0]; validated by the config loader.
    pub sample_ratio: f64,
    /// Per-request export timeout for all three signals.
    pub export_timeout: Duration,
    /// Batch knobs for the trace and log processors.
    pub batch: BatchSettings,
    /// Periodic export interval for metrics, independent of the batch delay.
    pub metric_interval: Duration,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: "service".to_string(),
            service_version: "dev".to_string(),
            endpoint: "http://localhost:4317".to_string(),
            insecure: false,
            headers: Vec::new(),
            sampler: SamplerKind::ParentBasedTraceIdRatio,
            sample_ratio: 1.0,
            export_timeout: Duration::from_secs(10),
            batch: BatchSettings::default(),
            metric_interval: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sampler_names_parse() {
        assert_eq!(SamplerKind::parse_lossy("always_on"), SamplerKind::AlwaysOn);
        assert_eq!(
            SamplerKind::parse_lossy("ALWAYS_OFF"),
            SamplerKind::AlwaysOff
        );
        assert_eq!(
            SamplerKind::parse_lossy("traceidratio"),
            SamplerKind::TraceIdRatio
        );
        assert_eq!(
            SamplerKind::parse_lossy(" parentbased_traceidratio "),
            SamplerKind::ParentBasedTraceIdRatio
        );
    }

    #[test]
    fn unknown_sampler_degrades_to_parent_based() {
        assert_eq!(
            SamplerKind::parse_lossy("probabilistic"),
            SamplerKind::ParentBasedTraceIdRatio
        );
    }
}
