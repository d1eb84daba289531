//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_audit_failure, record_llm_request,
    record_query, record_retrieval_fallback, record_stage_fallback, LlmRequestMetricParams,
    PrometheusMetrics, QueryOutcome,
};
