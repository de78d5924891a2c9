//! Traced HTTP client shared by every outbound lookup.
//!
//! Each call:
//! - derives its timeout from the caller's [`CallContext`] deadline
//! - injects the caller's trace context into the request headers
//! - records latency and outcome per upstream
//!
//! Nothing is retried; failures surface to the caller immediately.

use crate::{
    services::AppMetrics,
    telemetry::{CallContext, HeaderInjector, Telemetry},
};
use opentelemetry::trace::SpanKind;
use reqwest::{Client, StatusCode, header::HeaderMap};
use serde::de::DeserializeOwned;
use std::{future::Future, time::Duration, time::Instant};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Failure taxonomy for outbound lookups
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("no match found upstream")]
    NotFound,

    #[error("upstream returned status {0}")]
    Upstream(u16),

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error("invalid upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl LookupError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Transport(_) => "transport_error",
            LookupError::Decode(_) => "decode_error",
            LookupError::NotFound => "not_found",
            LookupError::Upstream(_) => "upstream_error",
            LookupError::DeadlineExceeded => "deadline_exceeded",
            LookupError::InvalidUrl(_) => "invalid_url",
        }
    }
}

/// Response whose body has not been read yet
pub struct UpstreamResponse {
    response: reqwest::Response,
}

impl UpstreamResponse {
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Read the whole body and decode it as JSON
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, LookupError> {
        let body = self
            .response
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.without_url()))?;

        serde_json::from_slice(&body).map_err(LookupError::Decode)
    }
}

/// HTTP client that propagates trace context and honours request deadlines
#[derive(Clone)]
pub struct TracedClient {
    client: Client,
    telemetry: Telemetry,
    metrics: Option<AppMetrics>,
    per_call_timeout: Option<Duration>,
}

impl TracedClient {
    /// Create a client; `per_call_timeout` caps each call below the
    /// request deadline when set
    pub fn new(
        telemetry: Telemetry,
        per_call_timeout: Option<Duration>,
        metrics: Option<AppMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            telemetry,
            metrics,
            per_call_timeout,
        })
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Run `op` inside a client span named `name`.
    ///
    /// `op` receives a context whose trace parent is the new span, so the
    /// headers it sends name this span as their parent. The span ends when
    /// this returns, whatever the outcome.
    pub async fn in_span<T, F, Fut>(
        &self,
        ctx: &CallContext,
        name: &'static str,
        op: F,
    ) -> Result<T, LookupError>
    where
        F: FnOnce(CallContext) -> Fut,
        Fut: Future<Output = Result<T, LookupError>>,
    {
        let span = self
            .telemetry
            .start_span(name, SpanKind::Client, ctx.trace());

        let result = op(ctx.with_trace(span.context().clone())).await;

        if let Err(err) = &result {
            span.record_error(err);
        }

        result
    }

    /// Issue a GET to `url` on behalf of `upstream`
    pub async fn get(
        &self,
        ctx: &CallContext,
        upstream: &'static str,
        url: Url,
    ) -> Result<UpstreamResponse, LookupError> {
        let Some(timeout) = ctx.call_timeout(self.per_call_timeout) else {
            warn!(upstream, path = url.path(), "Deadline passed before dispatch");
            self.record(upstream, "deadline_exceeded", Duration::ZERO);
            return Err(LookupError::DeadlineExceeded);
        };

        let mut headers = HeaderMap::new();
        self.telemetry
            .inject(ctx.trace(), &mut HeaderInjector(&mut headers));

        let start = Instant::now();
        let path = url.path().to_string();
        let result = self
            .client
            .get(url)
            .headers(headers)
            .timeout(timeout)
            .send()
            .await;
        let duration = start.elapsed();

        match result {
            Ok(response) => {
                let status = response.status();
                debug!(
                    upstream,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms = duration.as_millis() as u64,
                    "Upstream responded"
                );
                self.record(upstream, status_class(status), duration);
                Ok(UpstreamResponse { response })
            }
            Err(e) => {
                // The url may carry credentials in its query string
                let e = e.without_url();
                warn!(
                    upstream,
                    path = %path,
                    error = %e,
                    timed_out = e.is_timeout(),
                    duration_ms = duration.as_millis() as u64,
                    "Upstream request failed"
                );
                self.record(upstream, "transport_error", duration);
                Err(LookupError::Transport(e))
            }
        }
    }

    fn record(&self, upstream: &str, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics.record_upstream(upstream, outcome, duration);
        }
    }
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// Append path segments to a base URL, percent-encoding each segment
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, LookupError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| LookupError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
