//! Edge service: validates posted postal codes and forwards them to the
//! enrichment service.

use actix_web::{HttpServer, rt::System, web};
use cep_weather::{
    AppMetrics, EdgeConfig, EdgeState, EnrichmentClient, LogConfig, MetricsConfig, Telemetry,
    TelemetryConfig, TracedClient, create_edge_app, init_logging,
};
use std::io;
use tracing::{error, info};

fn main() -> io::Result<()> {
    init_logging(&LogConfig::from_env()).map_err(io::Error::other)?;

    let config = EdgeConfig::from_env();
    let metrics_config = MetricsConfig::from_env();
    let telemetry_config = TelemetryConfig::from_env("edge");

    // Exporter setup spawns its own thread and must happen off the runtime
    let telemetry = Telemetry::init(&telemetry_config).map_err(io::Error::other)?;

    let metrics = AppMetrics::new("edge").map_err(io::Error::other)?;
    let http = TracedClient::new(
        telemetry.clone(),
        config.outbound_timeout,
        Some(metrics.clone()),
    )
    .map_err(io::Error::other)?;
    let enrichment =
        EnrichmentClient::new(http, &config.enrichment_base_url).map_err(io::Error::other)?;

    let state = web::Data::new(EdgeState {
        telemetry: telemetry.clone(),
        enrichment,
        request_timeout: config.request_timeout,
    });

    info!(
        bind_addr = %config.bind_addr,
        enrichment_base_url = %config.enrichment_base_url,
        request_timeout_secs = config.request_timeout.as_secs(),
        "Starting edge service"
    );

    let served = System::new().block_on(async move {
        HttpServer::new(move || {
            create_edge_app(state.clone(), metrics.clone(), metrics_config.clone())
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
