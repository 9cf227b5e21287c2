use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Installs the global Prometheus recorder. Fails if one is already set.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        Ok(Self { handle })
    }

    /// `METRICS_ENABLED=1|true` turns the `/metrics` route on.
    pub fn enabled_from_env() -> bool {
        std::env::var(ENV_METRICS_ENABLED)
            .ok()
            .is_some_and(|v| matches!(v.trim(), "1" | "true"))
    }

    /// `/metrics` in Prometheus text format, meant to be merged into the
    /// health router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(render))
            .with_state(self.handle.clone())
    }
}

async fn render(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
