#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use std::sync::Arc;

use axum::http::StatusCode;

use simpleweb_server::ops::ERROR_CODE_HEADER;
use simpleweb_server::ops::readiness::{readiness_response, ReadinessGate};
use simpleweb_server::router::build_router;

use common::{get, state_from, MINIMAL};

#[tokio::test]
async fn healthz_is_always_alive() {
    let state = state_from(MINIMAL);
    let app = build_router(state);

    let r = get(&app, "/healthz").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.content_type.as_deref(), Some("application/json"));
    assert_eq!(r.body, r#"{"alive": true}"#);
}

#[tokio::test]
async fn readyz_follows_the_gate() {
    let state = state_from(MINIMAL);
    let app = build_router(state.clone());

    let r = get(&app, "/readyz").await;
    assert_eq!(r.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(r.body, "Service Unavailable");
    assert_eq!(r.content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(r.error_code.as_deref(), Some("NOT_READY"));

    state.readiness().set_ready(true);
    let r = get(&app, "/readyz").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.content_type.as_deref(), Some("application/json"));
    assert_eq!(r.body, r#"{"ready": true}"#);
    assert_eq!(r.error_code, None);

    // Draining on shutdown.
    state.readiness().set_ready(false);
    let r = get(&app, "/readyz").await;
    assert_eq!(r.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn missing_gate_reads_as_not_ready() {
    let resp = readiness_response(None);
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        resp.headers().get(ERROR_CODE_HEADER).map(|v| v.to_str().unwrap()),
        Some("NOT_READY")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn gate_tolerates_concurrent_writers() {
    let gate = Arc::new(ReadinessGate::new());
    let mut handles = Vec::new();
    for i in 0..16 {
        let gate = Arc::clone(&gate);
        handles.push(tokio::spawn(async move {
            gate.set_ready(i % 2 == 0);
            gate.is_ready()
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    gate.set_ready(true);
    assert!(gate.is_ready());
}

#[tokio::test]
async fn info_reports_build_metadata() {
    let state = state_from(MINIMAL);
    let app = build_router(state);

    let r = get(&app, "/info").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.content_type.as_deref(), Some("application/json"));

    let v: serde_json::Value = serde_json::from_str(&r.body).unwrap();
    assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(v["listen"], "0.0.0.0:8080");
    assert!(v["run_time"].as_str().unwrap().ends_with('s'));
    assert!(v["commit"].is_string());
    let rust_version = v["rust_version"].as_str().unwrap();
    assert!(rust_version.starts_with("rustc ") || rust_version == "unset", "{rust_version}");
}

#[tokio::test]
async fn metrics_reports_readiness_gauge() {
    let state = state_from(MINIMAL);
    let app = build_router(state.clone());

    let r = get(&app, "/metrics").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(
        r.content_type.as_deref(),
        Some("text/plain; version=0.0.4; charset=utf-8")
    );
    assert_eq!(common::sample(&r.body, "simpleweb_ready"), Some(0.0));

    state.readiness().set_ready(true);
    let r = get(&app, "/metrics").await;
    assert_eq!(common::sample(&r.body, "simpleweb_ready"), Some(1.0));
}
