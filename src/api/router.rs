use std::path::Path;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::health;
use super::state::AppState;
use super::v1;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Optional surfaces mounted next to the API
#[derive(Default)]
pub struct RouterExtras<'a> {
    pub static_dir: Option<&'a Path>,
    pub metrics: Option<(PrometheusMetrics, &'a str)>,
}

/// Create the router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    create_router_with_extras(state, RouterExtras::default())
}

/// Create the router, adding static assets and the metrics endpoint when given
pub fn create_router_with_extras(state: AppState, extras: RouterExtras<'_>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .with_state(state);

    if let Some((metrics, path)) = extras.metrics {
        router = router.merge(create_metrics_router(metrics, path));
    }

    if let Some(dir) = extras.static_dir {
        router = router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        );
    }

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
