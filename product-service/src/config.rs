use std::net::SocketAddr;
use std::time::Duration;

use envconfig::Envconfig;
use telemetry::{SamplerKind, TelemetrySettings};
use thiserror::Error;
use tracing::Level;

/// Configuration validation failures, raised in `main` before any telemetry
/// provider is constructed.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("OTEL_SAMPLE_RATIO must be within [0.0, 1.0], got {0}")]
    SampleRatioOutOfRange(f64),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("malformed OTEL_HEADERS entry '{0}': expected key=value")]
    MalformedHeader(String),
}

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(default = "127.0.0.1:3000")]
    pub address: SocketAddr,

    #[envconfig(default = "data/products.json")]
    pub product_data_file_path: String,

    #[envconfig(default = "product-service")]
    pub service_name: String,

    #[envconfig(default = "dev")]
    pub service_version: String,

    #[envconfig(default = "info")]
    pub log_level: Level,

    #[envconfig(default = "http://localhost:4317")]
    pub otel_endpoint: String,

    #[envconfig(default = "false")]
    pub otel_insecure: bool,

    /// Extra OTLP request headers as "key=value,key=value".
    pub otel_headers: Option<String>,

    #[envconfig(default = "parentbased_traceidratio")]
    pub otel_sampler_type: String,

    #[envconfig(default = "1.0")]
    pub otel_sample_ratio: f64,

    #[envconfig(default = "5")]
    pub otel_batch_timeout_secs: u64,

    #[envconfig(default = "60")]
    pub otel_metric_interval_secs: u64,

    #[envconfig(default = "10")]
    pub otel_export_timeout_secs: u64,

    #[envconfig(default = "30")]
    pub shutdown_total_timeout_secs: u64,

    #[envconfig(default = "10")]
    pub shutdown_server_timeout_secs: u64,

    #[envconfig(default = "5")]
    pub shutdown_telemetry_timeout_secs: u64,

    // Used for integration tests, where installing the global prometheus
    // recorder more than once does not work.
    #[envconfig(default = "true")]
    pub export_prometheus: bool,
}

impl Config {
    /// Range and syntax checks that envconfig's type parsing cannot express.
    /// Runs before telemetry initialisation; an unrecognised sampler type is
    /// deliberately not an error here (it degrades with a warning later).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.otel_sample_ratio) {
            return Err(ConfigError::SampleRatioOutOfRange(self.otel_sample_ratio));
        }
        for (name, value) in [
            ("SHUTDOWN_TOTAL_TIMEOUT_SECS", self.shutdown_total_timeout_secs),
            (
                "SHUTDOWN_SERVER_TIMEOUT_SECS",
                self.shutdown_server_timeout_secs,
            ),
            (
                "SHUTDOWN_TELEMETRY_TIMEOUT_SECS",
                self.shutdown_telemetry_timeout_secs,
            ),
            ("OTEL_EXPORT_TIMEOUT_SECS", self.otel_export_timeout_secs),
            ("OTEL_BATCH_TIMEOUT_SECS", self.otel_batch_timeout_secs),
            ("OTEL_METRIC_INTERVAL_SECS", self.otel_metric_interval_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }
        self.parsed_headers()?;
        Ok(())
    }

    pub fn overall_shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_total_timeout_secs)
    }

    pub fn server_shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_server_timeout_secs)
    }

    pub fn telemetry_shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_telemetry_timeout_secs)
    }

    /// The validated, typed settings handed to the telemetry bootstrap.
    pub fn telemetry_settings(&self) -> TelemetrySettings {
        TelemetrySettings {
            service_name: self.service_name.clone(),
            service_version: self.service_version.clone(),
            endpoint: self.otel_endpoint.clone(),
            insecure: self.otel_insecure,
            headers: self.parsed_headers().unwrap_or_default(),
            sampler: SamplerKind::parse_lossy(&self.otel_sampler_type),
            sample_ratio: self.otel_sample_ratio,
            export_timeout: Duration::from_secs(self.otel_export_timeout_secs),
            batch: telemetry::BatchSettings {
                scheduled_delay: Duration::from_secs(self.otel_batch_timeout_secs),
                ..telemetry::BatchSettings::default()
            },
            metric_interval: Duration::from_secs(self.otel_metric_interval_secs),
        }
    }

    fn parsed_headers(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let Some(raw) = &self.otel_headers else {
            return Ok(Vec::new());
        };
        let mut headers = Vec::new();
        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    headers.push((key.trim().to_string(), value.trim().to_string()));
                }
                _ => return Err(ConfigError::MalformedHeader(entry.to_string())),
            }
        }
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            address: "127.0.0.1:0".parse().unwrap(),
            product_data_file_path: "data/products.json".to_string(),
            service_name: "product-service".to_string(),
            service_version: "dev".to_string(),
            log_level: Level::INFO,
            otel_endpoint: "http://localhost:4317".to_string(),
            otel_insecure: true,
            otel_headers: None,
            otel_sampler_type: "parentbased_traceidratio".to_string(),
            otel_sample_ratio: 1.0,
            otel_batch_timeout_secs: 5,
            otel_metric_interval_secs: 60,
            otel_export_timeout_secs: 10,
            shutdown_total_timeout_secs: 30,
            shutdown_server_timeout_secs: 10,
            shutdown_telemetry_timeout_secs: 5,
            export_prometheus: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn sample_ratio_outside_unit_interval_is_rejected() {
        let mut config = base_config();
        config.otel_sample_ratio = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::SampleRatioOutOfRange(1.5))
        );
        config.otel_sample_ratio = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_shutdown_timeout_is_rejected() {
        let mut config = base_config();
        config.shutdown_total_timeout_secs = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroTimeout("SHUTDOWN_TOTAL_TIMEOUT_SECS"))
        );
    }

    #[test]
    fn headers_parse_into_pairs() {
        let mut config = base_config();
        config.otel_headers = Some("x-team=checkout, x-env=staging".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(
            config.telemetry_settings().headers,
            vec![
                ("x-team".to_string(), "checkout".to_string()),
                ("x-env".to_string(), "staging".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_header_is_rejected() {
        let mut config = base_config();
        config.otel_headers = Some("x-team=checkout,oops".to_string());
        assert_eq!(
            config.validate(),
            Err(ConfigError::MalformedHeader("oops".to_string()))
        );
    }

    #[test]
    fn unknown_sampler_type_is_not_a_validation_error() {
        let mut config = base_config();
        config.otel_sampler_type = "probabilistic".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.telemetry_settings().sampler,
            SamplerKind::ParentBasedTraceIdRatio
        );
    }
}
