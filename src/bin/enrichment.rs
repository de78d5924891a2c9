//! Enrichment service: resolves a postal code to its city and reports the
//! city's current temperature.

use actix_web::{HttpServer, rt::System, web};
use cep_weather::{
    AddressLookupClient, AppMetrics, EnrichmentConfig, EnrichmentState, LogConfig,
    MetricsConfig, Telemetry, TelemetryConfig, TracedClient, WeatherLookupClient,
    create_enrichment_app, init_logging,
};
use std::io;
use tracing::{error, info};

fn main() -> io::Result<()> {
    init_logging(&LogConfig::from_env()).map_err(io::Error::other)?;

    let config = EnrichmentConfig::from_env();
    if config.weather_api_key.trim().is_empty() {
        error!("WEATHER_API_KEY is not set");
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "WEATHER_API_KEY must be set",
        ));
    }

    let metrics_config = MetricsConfig::from_env();
    let telemetry_config = TelemetryConfig::from_env("enrichment");

    // Exporter setup spawns its own thread and must happen off the runtime
    let telemetry = Telemetry::init(&telemetry_config).map_err(io::Error::other)?;

    let metrics = AppMetrics::new("enrichment").map_err(io::Error::other)?;
    let http = TracedClient::new(
        telemetry.clone(),
        config.outbound_timeout,
        Some(metrics.clone()),
    )
    .map_err(io::Error::other)?;

    let address = AddressLookupClient::new(http.clone(), &config.address_base_url)
        .map_err(io::Error::other)?;
    let weather = WeatherLookupClient::new(
        http,
        &config.weather_base_url,
        config.weather_api_key.clone(),
    )
    .map_err(io::Error::other)?;

    let state = web::Data::new(EnrichmentState {
        telemetry: telemetry.clone(),
        address,
        weather,
        request_timeout: config.request_timeout,
        revalidate_cep: config.revalidate_cep,
    });

    info!(
        bind_addr = %config.bind_addr,
        address_base_url = %config.address_base_url,
        weather_base_url = %config.weather_base_url,
        revalidate_cep = config.revalidate_cep,
        "Starting enrichment service"
    );

    let served = System::new().block_on(async move {
        HttpServer::new(move || {
            create_enrichment_app(state.clone(), metrics.clone(), metrics_config.clone())
        })
        .bind(&config.bind_addr)?
        .run()
        .await
    });

    match telemetry.shutdown(telemetry_config.shutdown_timeout) {
        Ok(()) => info!("Telemetry flushed"),
        Err(e) => error!(error = %e, "Telemetry shutdown failed"),
    }

    served
}
