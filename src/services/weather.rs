//! Weather provider client (WeatherAPI-compatible).

use crate::{
    models::WeatherSample,
    services::http_client::{LookupError, TracedClient, join_segments},
    telemetry::CallContext,
};
use opentelemetry::{KeyValue, trace::TraceContextExt};
use tracing::{debug, warn};
use url::Url;

const UPSTREAM: &str = "weather";

/// Fetches current conditions via `GET {base}/v1/current.json?q={locality}&key={key}`
#[derive(Clone)]
pub struct WeatherLookupClient {
    http: TracedClient,
    base_url: Url,
    api_key: String,
}

impl WeatherLookupClient {
    pub fn new(
        http: TracedClient,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            api_key: api_key.into(),
        })
    }

    fn current_url(&self, locality: &str) -> Result<Url, LookupError> {
        let mut url = join_segments(&self.base_url, &["v1", "current.json"])?;
        url.query_pairs_mut()
            .append_pair("q", locality)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Current conditions for `locality`.
    ///
    /// A non-success status fails with [`LookupError::Upstream`] without
    /// reading the body.
    pub async fn lookup(&self, ctx: &CallContext, locality: &str) -> Result<WeatherSample, LookupError> {
        self.http
            .in_span(ctx, "lookup weather", |ctx| async move {
                let span = ctx.trace().span();
                span.set_attribute(KeyValue::new("weather.locality", locality.to_string()));

                let url = self.current_url(locality)?;
                let response = self.http.get(&ctx, UPSTREAM, url).await?;

                let status = response.status();
                if !status.is_success() {
                    warn!(city = locality, status = status.as_u16(), "Weather provider rejected request");
                    return Err(LookupError::Upstream(status.as_u16()));
                }

                let sample: WeatherSample = response.json().await?;
                debug!(city = locality, temp_c = sample.current.temp_c, "Weather resolved");
                Ok(sample)
            })
            .await
    }
}
