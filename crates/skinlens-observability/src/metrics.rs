//! Metrics collection with Prometheus
//!
//! This module provides Prometheus metrics for the SkinLens client:
//! - Backend request counts by method and status
//! - Backend request latency
//! - Token refresh outcomes
//! - Inference attempt outcomes
//! - Swallowed best-effort failures (image upload, result storage)

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Metrics collector for the SkinLens client
#[derive(Clone)]
pub struct ClientMetrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Backend requests by method and response status ("error" when no response)
    pub http_requests_total: CounterVec,
    /// Backend request duration
    pub http_request_duration_seconds: HistogramVec,
    /// Token refresh attempts by outcome
    pub token_refresh_total: CounterVec,
    /// Inference attempts by outcome
    pub inference_attempts_total: CounterVec,
    /// Best-effort steps that failed and were skipped
    pub best_effort_failures_total: CounterVec,
}

impl ClientMetrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new(
                "skinlens_http_requests_total",
                "Total number of backend API requests",
            ),
            &["method", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "skinlens_http_request_duration_seconds",
                "Backend API request duration in seconds",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method"],
        )?;

        let token_refresh_total = CounterVec::new(
            Opts::new(
                "skinlens_token_refresh_total",
                "Access token refresh attempts",
            ),
            &["outcome"],
        )?;

        let inference_attempts_total = CounterVec::new(
            Opts::new(
                "skinlens_inference_attempts_total",
                "Inference endpoint attempts",
            ),
            &["outcome"],
        )?;

        let best_effort_failures_total = CounterVec::new(
            Opts::new(
                "skinlens_best_effort_failures_total",
                "Failed best-effort steps that did not abort the operation",
            ),
            &["step"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(token_refresh_total.clone()))?;
        registry.register(Box::new(inference_attempts_total.clone()))?;
        registry.register(Box::new(best_effort_failures_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            http_requests_total,
            http_request_duration_seconds,
            token_refresh_total,
            inference_attempts_total,
            best_effort_failures_total,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a completed backend request; `status` is `None` when no response arrived
    pub fn record_request(&self, method: &str, status: Option<u16>, duration_secs: f64) {
        let status = status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "error".to_string());

        self.http_requests_total
            .with_label_values(&[method, status.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method])
            .observe(duration_secs);
    }

    pub fn record_refresh(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.token_refresh_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_inference_attempt(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.inference_attempts_total
            .with_label_values(&[outcome])
            .inc();
    }

    pub fn record_best_effort_failure(&self, step: &str) {
        self.best_effort_failures_total
            .with_label_values(&[step])
            .inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

impl std::fmt::Debug for ClientMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientMetrics").finish_non_exhaustive()
    }
}
