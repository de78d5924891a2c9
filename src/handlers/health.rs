//! Health check endpoint handler.

use crate::models::{HealthResponse, ServiceInfo};
use actix_web::{web, Error, HttpRequest, Result};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Reports liveness only; upstream providers are not probed.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the health status and name of the answering service in JSON format.",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse)
    )
)]
pub async fn health(req: HttpRequest) -> Result<web::Json<HealthResponse>, Error> {
    let service = req
        .app_data::<web::Data<ServiceInfo>>()
        .map(|info| info.name)
        .unwrap_or("unknown");

    Ok(web::Json(HealthResponse {
        status: "healthy".to_string(),
        service: service.to_string(),
    }))
}
