//! Edge service handler: `POST /cep`.

use crate::{
    handlers::error::{PipelineError, finish, record_failure},
    models::{CepRequest, CityTemperature},
    services::{EnrichmentClient, validate},
    telemetry::{CallContext, HeaderExtractor, Telemetry},
};
use actix_web::{HttpRequest, error::JsonPayloadError};
use opentelemetry::{KeyValue, trace::SpanKind};
use paperclip::actix::{api_v2_operation, web};
use std::time::Duration;
use tracing::debug;

/// Shared state of the edge service
#[derive(Clone)]
pub struct EdgeState {
    pub telemetry: Telemetry,
    pub enrichment: EnrichmentClient,
    pub request_timeout: Duration,
}

/// Validate the posted postal code and relay the enrichment result.
///
/// Answers 400 for an unparsable body, 422 for an invalid postal code,
/// 404 when the enrichment service cannot find it and 500 for any other
/// downstream failure.
#[api_v2_operation(
    summary = "City Temperature by Postal Code",
    description = "Validates the posted Brazilian postal code (CEP), resolves it through the enrichment service and returns the current temperature of its city in Celsius, Fahrenheit and Kelvin. Formatting characters such as '-' are stripped before validation.",
    tags("CEP"),
    responses(
        (status = 200, description = "Successful response", body = CityTemperature),
        (status = 400, description = "Bad Request - Body is not a JSON object with a string cep field"),
        (status = 404, description = "Not Found - No address for this postal code"),
        (status = 422, description = "Unprocessable Entity - Postal code is not eight digits"),
        (status = 500, description = "Internal Server Error - Enrichment failed or timed out")
    )
)]
pub async fn handle_cep(
    req: HttpRequest,
    body: web::Json<CepRequest>,
    state: web::Data<EdgeState>,
) -> Result<web::Json<CityTemperature>, PipelineError> {
    let parent = state.telemetry.extract(&HeaderExtractor(req.headers()));
    let span = state
        .telemetry
        .start_span("handle edge request", SpanKind::Server, &parent);
    let ctx = CallContext::new(span.context().clone(), state.request_timeout);

    let outcome = tokio::time::timeout(state.request_timeout, async {
        let cep = validate(&body.cep)?;

        span.set_attribute(KeyValue::new("cep", cep.to_string()));
        debug!(trace_id = %span.trace_id(), cep = %cep, "Postal code accepted");

        state
            .enrichment
            .city_temperature(&ctx, &cep)
            .await
            .map_err(PipelineError::Enrichment)
    })
    .await
    .unwrap_or(Err(PipelineError::DeadlineExceeded));

    finish(&req, &span, outcome)
}

/// Body extraction error handler for `POST /cep`.
///
/// The handler never runs for an unparsable body, so the request span is
/// opened and closed here to keep every request traced.
pub fn reject_malformed_body(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let err = PipelineError::MalformedBody(err);

    if let Some(state) = req.app_data::<web::Data<EdgeState>>() {
        let parent = state.telemetry.extract(&HeaderExtractor(req.headers()));
        let span = state
            .telemetry
            .start_span("handle edge request", SpanKind::Server, &parent);
        record_failure(req, &span, &err);
    }

    err.into()
}
