//! Mapping of pipeline failures to HTTP responses.
//!
//! Each failure maps to exactly one status and a short JSON string body.
//! Internal details stay in the logs and on the span.

use crate::{
    middleware::RequestId,
    services::{LookupError, ValidationError},
    telemetry::SpanScope,
};
use actix_web::{
    HttpMessage, HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError,
    http::StatusCode, web,
};
use paperclip::actix::api_v2_errors;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

pub const MALFORMED_BODY: &str = "invalid request body";
pub const INVALID_ZIPCODE: &str = "invalid zipcode";
pub const ZIPCODE_NOT_FOUND: &str = "can not find zipcode";
pub const ZIPCODE_ERROR: &str = "error getting zipcode";
pub const TEMPERATURE_ERROR: &str = "error getting temperature";
pub const REQUEST_TIMED_OUT: &str = "request timed out";

/// Failures of either service's request pipeline
#[api_v2_errors(
    code = 400, description = "Malformed request body",
    code = 404, description = "Postal code not found",
    code = 422, description = "Invalid postal code",
    code = 500, description = "Address or weather lookup failed, or the request timed out",
)]
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed request body: {0}")]
    MalformedBody(#[source] JsonPayloadError),

    #[error(transparent)]
    InvalidCep(#[from] ValidationError),

    #[error("enrichment call failed: {0}")]
    Enrichment(#[source] LookupError),

    #[error("address lookup failed: {0}")]
    Address(#[source] LookupError),

    #[error("weather lookup failed: {0}")]
    Weather(#[source] LookupError),

    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl PipelineError {
    /// Body sent to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            PipelineError::MalformedBody(_) => MALFORMED_BODY,
            PipelineError::InvalidCep(_) => INVALID_ZIPCODE,
            PipelineError::Enrichment(LookupError::NotFound)
            | PipelineError::Address(LookupError::NotFound) => ZIPCODE_NOT_FOUND,
            PipelineError::Enrichment(_) | PipelineError::Address(_) => ZIPCODE_ERROR,
            PipelineError::Weather(_) => TEMPERATURE_ERROR,
            PipelineError::DeadlineExceeded => REQUEST_TIMED_OUT,
        }
    }
}

impl ResponseError for PipelineError {
    fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            PipelineError::InvalidCep(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Enrichment(LookupError::NotFound)
            | PipelineError::Address(LookupError::NotFound) => StatusCode::NOT_FOUND,
            PipelineError::Enrichment(_)
            | PipelineError::Address(_)
            | PipelineError::Weather(_)
            | PipelineError::DeadlineExceeded => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.public_message())
    }
}

/// Request id assigned by the request id middleware, if any
fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

/// Record a failed request on its span and in the logs
pub(crate) fn record_failure(req: &HttpRequest, span: &SpanScope, err: &PipelineError) {
    let trace_id = span.trace_id();
    let request_id = request_id(req);
    let status = err.status_code();
    span.record_status(status.as_u16());

    if status.is_server_error() {
        span.record_error(err);
        error!(%trace_id, %request_id, status = status.as_u16(), error = %err, "Request failed");
    } else if status == StatusCode::NOT_FOUND {
        info!(%trace_id, %request_id, status = status.as_u16(), error = %err, "Request failed");
    } else {
        warn!(%trace_id, %request_id, status = status.as_u16(), error = %err, "Request rejected");
    }
}

/// Close out a pipeline run: record the outcome on the span, log it and
/// turn it into the handler's response
pub(crate) fn finish<T: Serialize>(
    req: &HttpRequest,
    span: &SpanScope,
    outcome: Result<T, PipelineError>,
) -> Result<web::Json<T>, PipelineError> {
    match outcome {
        Ok(body) => {
            span.record_status(StatusCode::OK.as_u16());
            info!(
                trace_id = %span.trace_id(),
                request_id = %request_id(req),
                status = 200,
                "Request served"
            );
            Ok(web::Json(body))
        }
        Err(err) => {
            record_failure(req, span, &err);
            Err(err)
        }
    }
}
