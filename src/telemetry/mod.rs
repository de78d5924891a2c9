//! Distributed tracing for the postal code pipeline.
//!
//! [`Telemetry`] is constructed once per process and handed to the app
//! factories; nothing here touches the OpenTelemetry globals, so tests can
//! swap in an in-memory exporter.
//!
//! Every hop follows the same contract:
//! - extract the caller's context from inbound headers ([`HeaderExtractor`]),
//!   or start a new trace when none is present
//! - open a [`SpanScope`] for the logical operation as a child of that context
//! - inject the current span into outbound headers ([`HeaderInjector`])
//! - let the scope drop, which ends the span on every exit path

pub mod carrier;
pub mod context;
pub mod logging;

pub use carrier::*;
pub use context::*;
pub use logging::*;

use crate::config::TelemetryConfig;
use opentelemetry::{
    Context, KeyValue,
    propagation::{Extractor, Injector, TextMapCompositePropagator, TextMapPropagator},
    trace::{SpanKind, Status, TraceContextExt, Tracer as _, TracerProvider as _},
};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    error::OTelSdkError,
    propagation::{BaggagePropagator, TraceContextPropagator},
    trace::{SdkTracer, SdkTracerProvider, SpanExporter},
};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::info;

const INSTRUMENTATION_SCOPE: &str = env!("CARGO_PKG_NAME");

/// Errors raised while setting up or tearing down trace export
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("tracer provider shutdown failed: {0}")]
    Shutdown(String),

    #[error("tracer provider shutdown did not finish within {0:?}")]
    ShutdownTimedOut(Duration),
}

/// Process-wide tracer, provider and propagator
#[derive(Clone)]
pub struct Telemetry {
    provider: SdkTracerProvider,
    tracer: SdkTracer,
    propagator: Arc<TextMapCompositePropagator>,
}

impl Telemetry {
    /// Build the tracer from configuration.
    ///
    /// With a traces endpoint configured, finished spans are batched and
    /// exported over OTLP/HTTP. Without one, spans are still created and
    /// propagated but never leave the process.
    ///
    /// The batch processor exports from its own thread with a blocking HTTP
    /// client, so this must be called outside of an async runtime.
    pub fn init(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let mut builder = SdkTracerProvider::builder().with_resource(resource(&config.service_name));

        match &config.traces_endpoint {
            Some(endpoint) => {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .with_endpoint(endpoint.clone())
                    .with_timeout(config.export_timeout)
                    .build()?;
                builder = builder.with_batch_exporter(exporter);

                info!(
                    service_name = %config.service_name,
                    endpoint = %endpoint,
                    "Trace export enabled"
                );
            }
            None => {
                info!(service_name = %config.service_name, "Trace export disabled");
            }
        }

        Ok(Self::from_provider(builder.build()))
    }

    /// A tracer whose spans are never exported
    pub fn noop(service_name: &str) -> Self {
        Self::from_provider(
            SdkTracerProvider::builder()
                .with_resource(resource(service_name))
                .build(),
        )
    }

    /// A tracer exporting each span synchronously as it ends
    pub fn with_exporter<E>(service_name: &str, exporter: E) -> Self
    where
        E: SpanExporter + 'static,
    {
        Self::from_provider(
            SdkTracerProvider::builder()
                .with_resource(resource(service_name))
                .with_simple_exporter(exporter)
                .build(),
        )
    }

    fn from_provider(provider: SdkTracerProvider) -> Self {
        let tracer = provider.tracer(INSTRUMENTATION_SCOPE);
        let propagator = TextMapCompositePropagator::new(vec![
            Box::new(TraceContextPropagator::new()),
            Box::new(BaggagePropagator::new()),
        ]);

        Self {
            provider,
            tracer,
            propagator: Arc::new(propagator),
        }
    }

    /// Read a trace context from an inbound carrier.
    ///
    /// Returns an empty context when the carrier holds no valid trace
    /// headers, so the next span becomes the root of a new trace.
    pub fn extract(&self, carrier: &dyn Extractor) -> Context {
        self.propagator.extract_with_context(&Context::new(), carrier)
    }

    /// Write the active span of `cx` into an outbound carrier
    pub fn inject(&self, cx: &Context, carrier: &mut dyn Injector) {
        self.propagator.inject_context(cx, carrier);
    }

    /// Open a span named `name` as a child of `parent`
    pub fn start_span(&self, name: &'static str, kind: SpanKind, parent: &Context) -> SpanScope {
        let span = self
            .tracer
            .span_builder(name)
            .with_kind(kind)
            .start_with_context(&self.tracer, parent);

        SpanScope {
            cx: parent.with_span(span),
        }
    }

    /// Flush pending spans and stop the exporter, waiting at most `timeout`
    pub fn shutdown(&self, timeout: Duration) -> Result<(), TelemetryError> {
        self.provider
            .shutdown_with_timeout(timeout)
            .map_err(|e| match e {
                OTelSdkError::Timeout(waited) => TelemetryError::ShutdownTimedOut(waited),
                other => TelemetryError::Shutdown(other.to_string()),
            })
    }
}

fn resource(service_name: &str) -> Resource {
    Resource::builder()
        .with_service_name(service_name.to_string())
        .build()
}

/// An open span that ends when dropped
pub struct SpanScope {
    cx: Context,
}

impl SpanScope {
    /// Context carrying this span, used as parent for child spans and
    /// for header injection
    pub fn context(&self) -> &Context {
        &self.cx
    }

    /// Hex trace id, for log correlation
    pub fn trace_id(&self) -> String {
        self.cx.span().span_context().trace_id().to_string()
    }

    pub fn set_attribute(&self, attribute: KeyValue) {
        self.cx.span().set_attribute(attribute);
    }

    /// Record the HTTP status answered or received by this operation.
    /// Server-class statuses mark the span as failed.
    pub fn record_status(&self, status: u16) {
        let span = self.cx.span();
        span.set_attribute(KeyValue::new("http.response.status_code", i64::from(status)));
        if status >= 500 {
            span.set_status(Status::error(format!("HTTP {status}")));
        }
    }

    /// Attach an error event and mark the span as failed
    pub fn record_error(&self, err: &(dyn std::error::Error + 'static)) {
        let span = self.cx.span();
        span.record_error(err);
        span.set_status(Status::error(err.to_string()));
    }
}

impl Drop for SpanScope {
    fn drop(&mut self) {
        self.cx.span().end();
    }
}
