//! OpenAPI specification generation and app factories.

use crate::{
    config::MetricsConfig,
    handlers::{edge, enrichment, get_metrics, health, version, EdgeState, EnrichmentState},
    middleware::{MetricsMiddleware, RequestIdMiddleware},
    models::ServiceInfo,
    services::AppMetrics,
};
use actix_web::App;
use paperclip::actix::{web, OpenApiExt};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the OpenAPI specification for one of the two services
pub fn create_openapi_spec(title: &str, description: &str) -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: title.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(format!(
                "{description}\n\n\
                ## Trace propagation\n\
                Requests may carry W3C `traceparent`, `tracestate` and `baggage` headers. \
                Spans opened while serving the request join the supplied trace, and the \
                context is forwarded on every outbound call.\n\
                \n\
                ## Errors\n\
                Failures are answered with a JSON string body:\n\
                - `400` `\"invalid request body\"`\n\
                - `422` `\"invalid zipcode\"`\n\
                - `404` `\"can not find zipcode\"`\n\
                - `500` `\"error getting zipcode\"`, `\"error getting temperature\"` or `\"request timed out\"`"
            )),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the edge service application
///
/// `POST /cep` validates the posted postal code and relays the
/// enrichment result; health, version and metrics are served alongside.
pub fn create_edge_app(
    state: web::Data<EdgeState>,
    metrics: AppMetrics,
    metrics_config: MetricsConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let metrics_path = metrics_config.path.clone();

    App::new()
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .app_data(state)
        .app_data(web::Data::new(metrics))
        .app_data(web::Data::new(metrics_config))
        .app_data(web::Data::new(ServiceInfo { name: "edge" }))
        .app_data(
            actix_web::web::JsonConfig::default()
                .content_type_required(false)
                .error_handler(edge::reject_malformed_body),
        )
        .wrap_api_with_spec(create_openapi_spec(
            "CEP Edge Service",
            "Validates Brazilian postal codes and answers with the current temperature of their city.",
        ))
        .service(web::resource("/cep").route(web::post().to(edge::handle_cep)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource(metrics_path.as_str()).route(web::get().to(get_metrics)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}

/// Creates the enrichment service application
///
/// `GET /cep/{cep}` resolves the postal code to a city and looks up its
/// current temperature; health, version and metrics are served alongside.
pub fn create_enrichment_app(
    state: web::Data<EnrichmentState>,
    metrics: AppMetrics,
    metrics_config: MetricsConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let metrics_path = metrics_config.path.clone();

    App::new()
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .app_data(state)
        .app_data(web::Data::new(metrics))
        .app_data(web::Data::new(metrics_config))
        .app_data(web::Data::new(ServiceInfo {
            name: "enrichment",
        }))
        .wrap_api_with_spec(create_openapi_spec(
            "CEP Enrichment Service",
            "Resolves a postal code to its city and reports the city's current temperature.",
        ))
        .service(web::resource("/cep/{cep}").route(web::get().to(enrichment::handle_cep)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource(metrics_path.as_str()).route(web::get().to(get_metrics)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}
