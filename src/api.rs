use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub const HEALTH_BODY: &str = "Media Bot Running!";
pub const ENV_PORT: &str = "PORT";
pub const DEFAULT_PORT: u16 = 3000;

/// Liveness probe for the hosting platform. Shares no state with the poller.
pub fn router() -> Router {
    Router::new()
        .route("/", get(|| async { HEALTH_BODY }))
        .layer(TraceLayer::new_for_http())
}

/// `$PORT`, or 3000 when unset or not a number.
pub fn port_from_env() -> u16 {
    std::env::var(ENV_PORT)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}
