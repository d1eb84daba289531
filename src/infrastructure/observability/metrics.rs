//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("claim_adjudicator_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// How a query request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Decided,
    Fallback,
    Failed,
}

impl QueryOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            QueryOutcome::Decided => "decided",
            QueryOutcome::Fallback => "fallback",
            QueryOutcome::Failed => "failed",
        }
    }
}

/// Record one handled query
pub fn record_query(outcome: QueryOutcome, duration: Duration) {
    let labels = [("outcome", outcome.as_str())];

    counter!("adjudication_requests_total", &labels).increment(1);
    histogram!("adjudication_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record a stage substituting its fallback value
pub fn record_stage_fallback(stage: &'static str, reason: &'static str) {
    counter!("stage_fallback_total", "stage" => stage, "reason" => reason).increment(1);
}

/// Record the retriever ignoring its threshold
pub fn record_retrieval_fallback() {
    counter!("retrieval_fallback_total").increment(1);
}

/// Record a failed audit append
pub fn record_audit_failure(backend: &'static str) {
    counter!("audit_write_failures_total", "backend" => backend).increment(1);
}

/// Record an LLM request metric
pub fn record_llm_request(params: LlmRequestMetricParams) {
    let labels = [
        ("provider", params.provider.to_string()),
        ("model", params.model.to_string()),
        ("stage", params.stage.to_string()),
        ("status", if params.success { "success" } else { "error" }.to_string()),
    ];

    counter!("llm_requests_total", &labels).increment(1);
    histogram!("llm_request_duration_seconds", &labels).record(params.duration.as_secs_f64());

    if let Some(tokens) = params.output_tokens {
        counter!("llm_output_tokens_total", &labels).increment(tokens);
    }
}

/// Parameters for LLM request metrics
pub struct LlmRequestMetricParams<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    pub stage: &'static str,
    pub duration: Duration,
    pub success: bool,
    pub output_tokens: Option<u64>,
}
