// tests/api_http.rs
//
// Health router exercised in-process via tower::ServiceExt::oneshot.

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use tower::ServiceExt as _; // for `oneshot`

use media_notifier::api;

const BODY_LIMIT: usize = 64 * 1024;

#[tokio::test]
async fn root_returns_static_running_text() {
    let req = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .expect("build GET /");

    let resp = api::router().oneshot(req).await.expect("oneshot /");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), api::HEALTH_BODY);
}

#[tokio::test]
async fn other_paths_are_404() {
    let req = Request::builder()
        .uri("/admin")
        .body(Body::empty())
        .unwrap();
    let resp = api::router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[serial_test::serial]
#[test]
fn port_defaults_when_unset_or_invalid() {
    std::env::remove_var(api::ENV_PORT);
    assert_eq!(api::port_from_env(), api::DEFAULT_PORT);

    std::env::set_var(api::ENV_PORT, "not-a-port");
    assert_eq!(api::port_from_env(), api::DEFAULT_PORT);

    std::env::set_var(api::ENV_PORT, "8080");
    assert_eq!(api::port_from_env(), 8080);
    std::env::remove_var(api::ENV_PORT);
}

#[tokio::test]
async fn metrics_router_serves_prometheus_text() {
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let m = media_notifier::metrics::Metrics {
        handle: recorder.handle(),
    };

    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = api::router().merge(m.router()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
