//! Trace export and log output configuration.

use std::env;
use std::time::Duration;

/// Configuration for the process-wide trace exporter
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    /// Full OTLP/HTTP traces URL; export is disabled when unset
    pub traces_endpoint: Option<String>,
    pub export_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl TelemetryConfig {
    /// Default configuration for a named service with export disabled
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            traces_endpoint: None,
            export_timeout: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(5),
        }
    }

    /// Load configuration from the standard `OTEL_*` environment variables.
    ///
    /// `OTEL_EXPORTER_OTLP_TRACES_ENDPOINT` is used verbatim, while
    /// `OTEL_EXPORTER_OTLP_ENDPOINT` is treated as a base URL and gets
    /// `/v1/traces` appended.
    pub fn from_env(default_service_name: &str) -> Self {
        let defaults = Self::new(default_service_name);

        let traces_endpoint = env::var("OTEL_EXPORTER_OTLP_TRACES_ENDPOINT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .map(|base| format!("{}/v1/traces", base.trim_end_matches('/')))
            });

        Self {
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
            traces_endpoint,
            export_timeout: env::var("OTEL_EXPORT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.export_timeout),
            shutdown_timeout: env::var("OTEL_SHUTDOWN_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_timeout),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Configuration for the `tracing` subscriber
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info,cep_weather=debug`
    pub filter: String,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            filter: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
        }
    }
}
