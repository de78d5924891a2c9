//! Operational endpoints served by both services: health, version,
//! metrics and the OpenAPI document.

use actix_web::{http::StatusCode, test, web};
use cep_weather::{
    AddressLookupClient, AppMetrics, EdgeState, EnrichmentClient, EnrichmentState,
    MetricsConfig, Telemetry, TracedClient, WeatherLookupClient, create_edge_app,
    create_enrichment_app,
};
use std::time::Duration;

fn edge_state() -> web::Data<EdgeState> {
    let telemetry = Telemetry::noop("edge");
    let http = TracedClient::new(telemetry.clone(), None, None).unwrap();

    web::Data::new(EdgeState {
        telemetry,
        enrichment: EnrichmentClient::new(http, "http://127.0.0.1:9").unwrap(),
        request_timeout: Duration::from_secs(5),
    })
}

fn enrichment_state() -> web::Data<EnrichmentState> {
    let telemetry = Telemetry::noop("enrichment");
    let http = TracedClient::new(telemetry.clone(), None, None).unwrap();

    web::Data::new(EnrichmentState {
        telemetry,
        address: AddressLookupClient::new(http.clone(), "http://127.0.0.1:9").unwrap(),
        weather: WeatherLookupClient::new(http, "http://127.0.0.1:9", "key").unwrap(),
        request_timeout: Duration::from_secs(5),
        revalidate_cep: true,
    })
}

#[actix_web::test]
async fn test_health_endpoint_names_service() {
    let app = test::init_service(create_edge_app(
        edge_state(),
        AppMetrics::new("edge").unwrap(),
        MetricsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        json,
        serde_json::json!({"status": "healthy", "service": "edge"})
    );

    let app = test::init_service(create_enrichment_app(
        enrichment_state(),
        AppMetrics::new("enrichment").unwrap(),
        MetricsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["service"], "enrichment");
}

#[actix_web::test]
async fn test_version_endpoint() {
    let app = test::init_service(create_enrichment_app(
        enrichment_state(),
        AppMetrics::new("enrichment").unwrap(),
        MetricsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri("/api/version").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["commit"].is_string());
    assert!(json["build_time"].is_string());
}

#[actix_web::test]
async fn test_openapi_document_lists_operational_routes() {
    let app = test::init_service(create_edge_app(
        edge_state(),
        AppMetrics::new("edge").unwrap(),
        MetricsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri("/api/spec/v2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["info"]["title"], "CEP Edge Service");
    assert!(json["paths"].get("/api/health").is_some());
    assert!(json["paths"].get("/api/version").is_some());
}

#[actix_web::test]
async fn test_openapi_document_describes_pipeline_endpoints() {
    let app = test::init_service(create_edge_app(
        edge_state(),
        AppMetrics::new("edge").unwrap(),
        MetricsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri("/api/spec/v2").to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let post = &json["paths"]["/cep"]["post"];
    assert!(post.is_object(), "POST /cep missing from {json}");
    for status in ["200", "400", "404", "422", "500"] {
        assert!(post["responses"].get(status).is_some(), "no {status} response");
    }
    assert!(json["definitions"].get("CepRequest").is_some());
    assert!(json["definitions"].get("CityTemperature").is_some());

    let app = test::init_service(create_enrichment_app(
        enrichment_state(),
        AppMetrics::new("enrichment").unwrap(),
        MetricsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri("/api/spec/v2").to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let get = &json["paths"]["/cep/{cep}"]["get"];
    assert!(get.is_object(), "GET /cep/{{cep}} missing from {json}");
    assert!(get["responses"].get("404").is_some());
    assert!(get["responses"].get("422").is_some());
}

#[actix_web::test]
async fn test_metrics_record_requests_by_route() {
    let app = test::init_service(create_edge_app(
        edge_state(),
        AppMetrics::new("edge").unwrap(),
        MetricsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/cep")
        .set_payload(r#"{"cep":"123"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = std::str::from_utf8(&body).unwrap();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains(r#"route="/cep""#));
    assert!(body.contains(r#"status="422""#));
    assert!(body.contains("app_info"));
}

#[actix_web::test]
async fn test_metrics_can_be_disabled() {
    let app = test::init_service(create_edge_app(
        edge_state(),
        AppMetrics::new("edge").unwrap(),
        MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        },
    ))
    .await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_metrics_path_is_configurable() {
    let app = test::init_service(create_enrichment_app(
        enrichment_state(),
        AppMetrics::new("enrichment").unwrap(),
        MetricsConfig {
            enabled: true,
            path: "/internal/metrics".to_string(),
        },
    ))
    .await;

    let req = test::TestRequest::get().uri("/internal/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let app = test::init_service(create_edge_app(
        edge_state(),
        AppMetrics::new("edge").unwrap(),
        MetricsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "req-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-42");
}
