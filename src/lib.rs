//! CEP Weather - postal code to city temperature, across two traced services
//!
//! Two HTTP services built with Actix Web and Paperclip:
//! - the **edge** service accepts `POST /cep` with `{"cep": "..."}`,
//!   validates the postal code and forwards it
//! - the **enrichment** service answers `GET /cep/{cep}` by resolving the
//!   postal code to a city, looking up the city's current temperature and
//!   converting it to Celsius, Fahrenheit and Kelvin
//!
//! Every request opens a server span that joins any W3C trace context the
//! caller supplied; outbound calls open client spans and forward the
//! context, so one trace covers the whole pipeline.
//!
//! ## Architecture
//!
//! - `models/` - Request, response and provider payload types
//! - `handlers/` - HTTP handlers, error mapping and app factories
//! - `middleware/` - Request IDs, access logs and request metrics
//! - `services/` - Validation, conversion and upstream lookup clients
//! - `telemetry/` - Tracer lifecycle, propagation, deadlines and logging
//! - `utils/` - Request inspection helpers
//! - `config/` - Configuration structures and environment loading
//!
//! ## Quick Start
//!
//! ```no_run
//! use cep_weather::{
//!     create_edge_app, AppMetrics, EdgeState, EnrichmentClient, MetricsConfig, Telemetry,
//!     TracedClient,
//! };
//! use std::time::Duration;
//!
//! #[actix_web::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let telemetry = Telemetry::noop("edge");
//!     let http = TracedClient::new(telemetry.clone(), None, None)?;
//!     let state = actix_web::web::Data::new(EdgeState {
//!         telemetry,
//!         enrichment: EnrichmentClient::new(http, "http://localhost:8081")?,
//!         request_timeout: Duration::from_secs(60),
//!     });
//!     let metrics = AppMetrics::new("edge")?;
//!     let _app = create_edge_app(state, metrics, MetricsConfig::default());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{EdgeConfig, EnrichmentConfig, LogConfig, MetricsConfig, TelemetryConfig};
pub use handlers::{
    EdgeState, EnrichmentState, PipelineError, create_edge_app, create_enrichment_app,
    create_openapi_spec, get_metrics, health, version,
};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware};
pub use models::{CepRequest, CityTemperature, HealthResponse, VersionResponse};
pub use services::{
    AddressLookupClient, AppMetrics, Cep, EnrichmentClient, LookupError, TracedClient,
    WeatherLookupClient, convert, validate,
};
pub use telemetry::{CallContext, Telemetry, TelemetryError, init_logging};
