//! Client for the enrichment service, used by the edge service.

use crate::{
    models::CityTemperature,
    services::{
        http_client::{LookupError, TracedClient, join_segments},
        validation::Cep,
    },
    telemetry::CallContext,
};
use reqwest::StatusCode;
use url::Url;

const UPSTREAM: &str = "enrichment";

/// Calls `GET {base}/cep/{cep}` and relays the decoded result
#[derive(Clone)]
pub struct EnrichmentClient {
    http: TracedClient,
    base_url: Url,
}

impl EnrichmentClient {
    pub fn new(http: TracedClient, base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Resolve city and temperature for a validated postal code.
    ///
    /// A 404 from the enrichment service is reported as
    /// [`LookupError::NotFound`]; any other non-200 status as
    /// [`LookupError::Upstream`].
    pub async fn city_temperature(
        &self,
        ctx: &CallContext,
        cep: &Cep,
    ) -> Result<CityTemperature, LookupError> {
        self.http
            .in_span(ctx, "call enrichment", |ctx| async move {
                let url = join_segments(&self.base_url, &["cep", cep.as_str()])?;
                let response = self.http.get(&ctx, UPSTREAM, url).await?;

                match response.status() {
                    StatusCode::OK => response.json().await,
                    StatusCode::NOT_FOUND => Err(LookupError::NotFound),
                    status => Err(LookupError::Upstream(status.as_u16())),
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::validation::validate, telemetry::Telemetry};
    use opentelemetry::Context;
    use std::time::Duration;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> EnrichmentClient {
        let http = TracedClient::new(Telemetry::noop("test"), None, None).unwrap();
        EnrichmentClient::new(http, base_url).unwrap()
    }

    fn ctx() -> CallContext {
        CallContext::new(Context::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_success_is_relayed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cep/01310100"))
            .and(header_exists("traceparent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": "São Paulo", "temp_C": 25.0, "temp_F": 77.0, "temp_K": 298.0
            })))
            .mount(&mock_server)
            .await;

        let cep = validate("01310-100").unwrap();
        let result = client(&mock_server.uri())
            .city_temperature(&ctx(), &cep)
            .await
            .unwrap();
        assert_eq!(result.city, "São Paulo");
        assert_eq!(result.temp_k, 298.0);
    }

    #[tokio::test]
    async fn test_not_found_is_kept_distinct() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json("can not find zipcode"))
            .mount(&mock_server)
            .await;

        let cep = validate("99999999").unwrap();
        let err = client(&mock_server.uri())
            .city_temperature(&ctx(), &cep)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::NotFound));
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json("error getting temperature"))
            .mount(&mock_server)
            .await;

        let cep = validate("01310100").unwrap();
        let err = client(&mock_server.uri())
            .city_temperature(&ctx(), &cep)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::Upstream(500)));
    }
}
