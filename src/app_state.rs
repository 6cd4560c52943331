//! Application state shared across status-listener handlers.

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;

/// State for the status listener.
///
/// The relay path never touches this; the listener and the relay share
/// nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Handle for rendering Prometheus metrics (absent in tests)
    pub metrics: Option<PrometheusHandle>,
}
