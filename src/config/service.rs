//! Service configuration for the edge and enrichment binaries.

use std::env;
use std::time::Duration;

/// Configuration for the edge service (`POST /cep`)
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    pub bind_addr: String,
    /// Base URL of the enrichment service, without trailing slash
    pub enrichment_base_url: String,
    /// Overall budget for one inbound request, outbound calls included
    pub request_timeout: Duration,
    /// Optional cap for a single outbound call inside the request budget
    pub outbound_timeout: Option<Duration>,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            enrichment_base_url: "http://localhost:8081".to_string(),
            request_timeout: Duration::from_secs(60),
            outbound_timeout: None,
        }
    }
}

impl EdgeConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: env::var("EDGE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            enrichment_base_url: env::var("ENRICHMENT_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.enrichment_base_url),
            request_timeout: secs_from_env("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
            outbound_timeout: secs_from_env("OUTBOUND_TIMEOUT_SECS"),
        }
    }
}

/// Configuration for the enrichment service (`GET /cep/{cep}`)
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub bind_addr: String,
    pub address_base_url: String,
    pub weather_base_url: String,
    pub weather_api_key: String,
    pub request_timeout: Duration,
    pub outbound_timeout: Option<Duration>,
    /// Re-run postal code validation on the path parameter
    pub revalidate_cep: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            address_base_url: "http://viacep.com.br".to_string(),
            weather_base_url: "https://api.weatherapi.com".to_string(),
            weather_api_key: String::new(),
            request_timeout: Duration::from_secs(60),
            outbound_timeout: None,
            revalidate_cep: true,
        }
    }
}

impl EnrichmentConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// `WEATHER_API_KEY` is not enforced here; the binary refuses to start
    /// without it.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: env::var("ENRICHMENT_BIND_ADDR").unwrap_or(defaults.bind_addr),
            address_base_url: env::var("ADDRESS_PROVIDER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.address_base_url),
            weather_base_url: env::var("WEATHER_PROVIDER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.weather_base_url),
            weather_api_key: env::var("WEATHER_API_KEY").unwrap_or_default(),
            request_timeout: secs_from_env("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
            outbound_timeout: secs_from_env("OUTBOUND_TIMEOUT_SECS"),
            revalidate_cep: env::var("REVALIDATE_CEP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.revalidate_cep),
        }
    }
}

fn secs_from_env(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
