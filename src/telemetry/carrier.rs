//! Header carriers for trace context propagation.
//!
//! The propagator only needs to read and write string pairs; these adapters
//! expose actix inbound headers and reqwest outbound headers through the
//! OpenTelemetry [`Extractor`] / [`Injector`] traits. Other transports plug
//! in by implementing the same two traits.

use actix_web::http::header::HeaderMap as InboundHeaders;
use opentelemetry::propagation::{Extractor, Injector};
use reqwest::header::{HeaderMap as OutboundHeaders, HeaderName, HeaderValue};

/// Read-only view over the headers of an inbound actix request
pub struct HeaderExtractor<'a>(pub &'a InboundHeaders);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

/// Writable view over the headers of an outbound reqwest request
pub struct HeaderInjector<'a>(pub &'a mut OutboundHeaders);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        // Pairs that are not valid HTTP header tokens are dropped
        let Ok(name) = HeaderName::from_bytes(key.as_bytes()) else {
            tracing::debug!(key, "Skipping trace header with invalid name");
            return;
        };
        let Ok(value) = HeaderValue::from_str(&value) else {
            tracing::debug!(key, "Skipping trace header with invalid value");
            return;
        };
        self.0.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::Telemetry;
    use actix_web::http::header::{
        HeaderName as InboundName, HeaderValue as InboundValue,
    };
    use opentelemetry::{Context, trace::SpanKind, trace::TraceContextExt};

    #[test]
    fn test_injected_headers_are_extracted_on_the_other_side() {
        let telemetry = Telemetry::noop("test");
        let scope = telemetry.start_span("call", SpanKind::Client, &Context::new());

        let mut outbound = OutboundHeaders::new();
        telemetry.inject(scope.context(), &mut HeaderInjector(&mut outbound));
        assert!(outbound.contains_key("traceparent"));

        // Copy the outbound pairs into an inbound map, as the network would
        let mut inbound = InboundHeaders::new();
        for (name, value) in outbound.iter() {
            inbound.insert(
                InboundName::from_bytes(name.as_str().as_bytes()).unwrap(),
                InboundValue::from_bytes(value.as_bytes()).unwrap(),
            );
        }

        let extracted = telemetry.extract(&HeaderExtractor(&inbound));
        let remote = extracted.span().span_context().clone();
        assert_eq!(remote.trace_id().to_string(), scope.trace_id());
        assert_eq!(remote.span_id(), scope.context().span().span_context().span_id());
    }

    #[test]
    fn test_extractor_is_case_insensitive() {
        let mut inbound = InboundHeaders::new();
        inbound.insert(
            InboundName::from_static("traceparent"),
            InboundValue::from_static("00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01"),
        );

        let extractor = HeaderExtractor(&inbound);
        assert!(extractor.get("TraceParent").is_some());
        assert_eq!(extractor.keys(), vec!["traceparent"]);
    }

    #[test]
    fn test_injector_skips_invalid_values() {
        let mut outbound = OutboundHeaders::new();
        let mut injector = HeaderInjector(&mut outbound);
        injector.set("baggage", "line\nbreak".to_string());
        injector.set("bad header", "value".to_string());
        assert!(outbound.is_empty());
    }
}
