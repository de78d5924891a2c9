//! Address provider client (ViaCEP-compatible).

use crate::{
    models::AddressRecord,
    services::http_client::{LookupError, TracedClient, join_segments},
    telemetry::CallContext,
};
use opentelemetry::{KeyValue, trace::TraceContextExt};
use tracing::{debug, info};
use url::Url;

const UPSTREAM: &str = "address";

/// Resolves a postal code to an address via `GET {base}/ws/{cep}/json/`
#[derive(Clone)]
pub struct AddressLookupClient {
    http: TracedClient,
    base_url: Url,
}

impl AddressLookupClient {
    pub fn new(http: TracedClient, base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Look up `cep`, failing with [`LookupError::NotFound`] when the
    /// provider has no address with a locality for it
    pub async fn lookup(&self, ctx: &CallContext, cep: &str) -> Result<AddressRecord, LookupError> {
        self.http
            .in_span(ctx, "lookup address", |ctx| async move {
                let span = ctx.trace().span();
                span.set_attribute(KeyValue::new("address.cep", cep.to_string()));

                let url = join_segments(&self.base_url, &["ws", cep, "json", ""])?;
                let response = self.http.get(&ctx, UPSTREAM, url).await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LookupError::Upstream(status.as_u16()));
                }

                let record: AddressRecord = response.json().await?;
                if !record.is_resolved() {
                    info!(cep, "Address provider has no match");
                    return Err(LookupError::NotFound);
                }

                span.set_attribute(KeyValue::new("address.locality", record.locality.clone()));
                debug!(cep, city = %record.locality, region = %record.region, "Address resolved");
                Ok(record)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::Telemetry;
    use opentelemetry::Context;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> AddressLookupClient {
        let http = TracedClient::new(Telemetry::noop("test"), None, None).unwrap();
        AddressLookupClient::new(http, base_url).unwrap()
    }

    fn ctx() -> CallContext {
        CallContext::new(Context::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_lookup_resolves_address() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ws/01310100/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "01310-100",
                "logradouro": "Avenida Paulista",
                "bairro": "Bela Vista",
                "localidade": "São Paulo",
                "uf": "SP"
            })))
            .mount(&mock_server)
            .await;

        let record = client(&mock_server.uri()).lookup(&ctx(), "01310100").await.unwrap();
        assert_eq!(record.locality, "São Paulo");
        assert_eq!(record.district, "Bela Vista");
    }

    #[tokio::test]
    async fn test_empty_record_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ws/99999999/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "",
                "localidade": ""
            })))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server.uri())
            .lookup(&ctx(), "99999999")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::NotFound));
    }

    #[tokio::test]
    async fn test_provider_error_flag_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"erro": "true"})))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server.uri())
            .lookup(&ctx(), "12345678")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::NotFound));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server.uri())
            .lookup(&ctx(), "12345678")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("<h1>Bad Request</h1>"))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server.uri())
            .lookup(&ctx(), "12345678")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::Upstream(400)));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        // Nothing listens on the discard port
        let err = client("http://127.0.0.1:9")
            .lookup(&ctx(), "12345678")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::Transport(_)));
    }
}
