//! Metrics collection and Prometheus integration service.

use prometheus::{CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::{Duration, Instant};

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub upstream_requests_total: CounterVec,
    pub upstream_request_duration_seconds: HistogramVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    pub start_time: Instant,
}

impl AppMetrics {
    /// Create a new metrics collector for the named service
    pub fn new(service: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Inbound requests by method, status, and route pattern
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        // Outbound calls by upstream and outcome (status class or error kind)
        let upstream_requests_total = CounterVec::new(
            Opts::new(
                "upstream_requests_total",
                "Total outbound requests by upstream and outcome",
            ),
            &["upstream", "outcome"],
        )?;

        let upstream_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "upstream_request_duration_seconds",
                "Outbound request duration in seconds",
            )
            .buckets(vec![
                0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ]),
            &["upstream"],
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["service", "version", "commit", "build_time"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(upstream_requests_total.clone()))?;
        registry.register(Box::new(upstream_request_duration_seconds.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;

        app_info
            .with_label_values(&[
                service,
                env!("CARGO_PKG_VERSION"),
                option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
                option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
            ])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            upstream_requests_total,
            upstream_request_duration_seconds,
            app_uptime_seconds,
            app_info,
            start_time: Instant::now(),
        })
    }

    /// Record an inbound HTTP request with method, route, status, and duration
    pub fn record_request(
        &self,
        method: &str,
        route: &str,
        status: u16,
        duration: Duration,
        metrics_path: &str,
    ) {
        if route == metrics_path {
            // Scrapes would otherwise dominate the request counters
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    /// Record one outbound call to `upstream`
    pub fn record_upstream(&self, upstream: &str, outcome: &str, duration: Duration) {
        self.upstream_requests_total
            .with_label_values(&[upstream, outcome])
            .inc();

        self.upstream_request_duration_seconds
            .with_label_values(&[upstream])
            .observe(duration.as_secs_f64());
    }

    /// Update the application uptime gauge
    pub fn update_uptime(&self) {
        self.app_uptime_seconds
            .set(self.start_time.elapsed().as_secs_f64());
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_path_is_not_recorded() {
        let metrics = AppMetrics::new("edge").unwrap();
        metrics.record_request("GET", "/metrics", 200, Duration::from_millis(1), "/metrics");
        metrics.record_request("POST", "/cep", 200, Duration::from_millis(5), "/metrics");

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains(r#"route="/cep""#));
        assert!(!rendered.contains(r#"route="/metrics""#));
    }

    #[test]
    fn test_upstream_outcomes_are_labelled() {
        let metrics = AppMetrics::new("enrichment").unwrap();
        metrics.record_upstream("weather", "4xx", Duration::from_millis(20));

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("upstream_requests_total"));
        assert!(rendered.contains(r#"outcome="4xx""#));
        assert!(rendered.contains(r#"upstream="weather""#));
        assert!(rendered.contains(r#"service="enrichment""#));
    }
}
