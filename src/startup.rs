//! Application startup and initialization.

use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::config::Config;
use crate::handlers::health;

/// Install the Prometheus recorder.
///
/// Installation can fail when a recorder is already registered (tests);
/// the relay runs fine without one, counters just become no-ops.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("✅ Prometheus metrics initialized");
            Some(handle)
        }
        Err(e) => {
            warn!("⚠️ Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

/// Assemble the state for the status listener.
pub fn build_state(config: Config) -> AppState {
    AppState {
        config,
        metrics: init_metrics(),
    }
}

/// Build the status-listener router: health, metrics, catch-all.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .fallback(health::root)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
