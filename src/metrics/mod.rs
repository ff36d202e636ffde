//! Prometheus metrics for the gateway.
//!
//! Two families are exported:
//! - HTTP request counts and latencies, recorded by [`MetricsLayer`] per matched route
//! - Database query counts by outcome and latencies, recorded by the search service
//!
//! # Example
//! ```no_run
//! use person_search_gateway::metrics::{record_query, QueryOutcome};
//! use std::time::Duration;
//!
//! record_query("search", QueryOutcome::Found, Duration::from_millis(12));
//! ```

mod middleware;

pub use middleware::{MetricsLayer, MetricsService};

use lazy_static::lazy_static;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use std::time::Duration;

const NAMESPACE: &str = "person_search_gateway";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Total number of HTTP requests received
    ///
    /// Labels: method, path, status_code
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace(NAMESPACE),
        &["method", "path", "status_code"]
    ).expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// HTTP request duration in seconds
    ///
    /// Labels: method, path
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric");

    /// Database queries by operation and outcome
    ///
    /// Labels: operation (lookup, search, autocomplete), outcome (found, empty, error)
    pub static ref QUERIES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("queries_total", "Total number of database queries")
            .namespace(NAMESPACE),
        &["operation", "outcome"]
    ).expect("Failed to create QUERIES_TOTAL metric");

    /// Database query duration in seconds
    ///
    /// Labels: operation
    pub static ref QUERY_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "query_duration_seconds",
            "Database query duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["operation"]
    ).expect("Failed to create QUERY_DURATION_SECONDS metric");
}

/// How a database query ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Found,
    Empty,
    Error,
}

impl QueryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryOutcome::Found => "found",
            QueryOutcome::Empty => "empty",
            QueryOutcome::Error => "error",
        }
    }
}

/// Register all metrics with the global registry
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(QUERIES_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(QUERY_DURATION_SECONDS.clone()))?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Record one database query
pub fn record_query(operation: &str, outcome: QueryOutcome, elapsed: Duration) {
    QUERIES_TOTAL
        .with_label_values(&[operation, outcome.as_str()])
        .inc();
    QUERY_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(elapsed.as_secs_f64());
}

/// Generate Prometheus text format metrics
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        // The global registry only accepts each collector once per process
        let _ = init_metrics();
        assert!(init_metrics().is_err());
    }

    #[test]
    fn test_record_query_increments_counter() {
        let before = QUERIES_TOTAL
            .with_label_values(&["metrics_test", "empty"])
            .get();
        record_query("metrics_test", QueryOutcome::Empty, Duration::from_millis(3));
        let after = QUERIES_TOTAL
            .with_label_values(&["metrics_test", "empty"])
            .get();
        assert_eq!(after, before + 1.0);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(QueryOutcome::Found.as_str(), "found");
        assert_eq!(QueryOutcome::Empty.as_str(), "empty");
        assert_eq!(QueryOutcome::Error.as_str(), "error");
    }
}
