//! Application state

use credgate_auth::{AccessGate, AuthService};

/// Prometheus handle used to render `/metrics`
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub gate: AccessGate,
}

impl AppState {
    pub fn new(auth: AuthService, gate: AccessGate) -> Self {
        Self { auth, gate }
    }
}
