//! Enrichment service handler: `GET /cep/{cep}`.

use crate::{
    handlers::error::{PipelineError, finish},
    models::CityTemperature,
    services::{AddressLookupClient, WeatherLookupClient, convert, validate},
    telemetry::{CallContext, HeaderExtractor, Telemetry},
};
use actix_web::HttpRequest;
use opentelemetry::{KeyValue, trace::SpanKind};
use paperclip::actix::{api_v2_operation, web};
use std::time::Duration;
use tracing::debug;

/// Shared state of the enrichment service
#[derive(Clone)]
pub struct EnrichmentState {
    pub telemetry: Telemetry,
    pub address: AddressLookupClient,
    pub weather: WeatherLookupClient,
    pub request_timeout: Duration,
    /// Validate the path parameter again instead of trusting the edge
    pub revalidate_cep: bool,
}

/// Resolve a postal code to its city, then the city to its current
/// temperature in Celsius, Fahrenheit and Kelvin.
///
/// Both lookups run as sibling spans under this request's span; the
/// weather lookup starts only once the address is resolved.
#[api_v2_operation(
    summary = "City Temperature by Validated Postal Code",
    description = "Resolves the postal code (CEP) to its city through the address provider, then looks up the city's current temperature and reports it in Celsius, Fahrenheit and Kelvin.",
    tags("CEP"),
    responses(
        (status = 200, description = "Successful response", body = CityTemperature),
        (status = 404, description = "Not Found - No address for this postal code"),
        (status = 422, description = "Unprocessable Entity - Postal code is not eight digits"),
        (status = 500, description = "Internal Server Error - Address or weather lookup failed, or timed out")
    )
)]
pub async fn handle_cep(
    req: HttpRequest,
    cep: web::Path<String>,
    state: web::Data<EnrichmentState>,
) -> Result<web::Json<CityTemperature>, PipelineError> {
    let parent = state.telemetry.extract(&HeaderExtractor(req.headers()));
    let span = state
        .telemetry
        .start_span("handle enrichment request", SpanKind::Server, &parent);
    let ctx = CallContext::new(span.context().clone(), state.request_timeout);

    let outcome = tokio::time::timeout(state.request_timeout, async {
        let raw = cep.into_inner();
        let cep = if state.revalidate_cep {
            validate(&raw)?.to_string()
        } else {
            raw
        };
        span.set_attribute(KeyValue::new("cep", cep.clone()));

        let address = state
            .address
            .lookup(&ctx, &cep)
            .await
            .map_err(PipelineError::Address)?;

        let sample = state
            .weather
            .lookup(&ctx, &address.locality)
            .await
            .map_err(PipelineError::Weather)?;

        let reading = convert(sample.current.temp_c);
        debug!(
            trace_id = %span.trace_id(),
            city = %address.locality,
            temp_c = reading.celsius,
            "Temperature resolved"
        );

        Ok::<_, PipelineError>(CityTemperature::new(address.locality, reading))
    })
    .await
    .unwrap_or(Err(PipelineError::DeadlineExceeded));

    finish(&req, &span, outcome)
}
