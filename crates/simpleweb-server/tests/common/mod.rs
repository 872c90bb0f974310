#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use simpleweb_server::{app_state::AppState, config};

pub const MINIMAL: &str = "version: 1\n";

pub fn state_from(yaml: &str) -> AppState {
    let cfg = config::load_from_str(yaml).expect("config must parse");
    AppState::new(cfg).expect("state must build")
}

pub struct Reply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub error_code: Option<String>,
    pub body: String,
}

pub async fn send(app: &Router, method: Method, uri: &str) -> Reply {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let error_code = resp
        .headers()
        .get(simpleweb_server::ops::ERROR_CODE_HEADER)
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    Reply {
        status,
        content_type,
        error_code,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str) -> Reply {
    send(app, Method::GET, uri).await
}

/// Value of one exposition sample, matched on the full series name + labels.
pub fn sample(exposition: &str, series: &str) -> Option<f64> {
    exposition.lines().find_map(|line| {
        let rest = line.strip_prefix(series)?;
        rest.strip_prefix(' ')?.trim().parse().ok()
    })
}

pub fn requests_series(method: &str, route: &str, class: &str) -> String {
    format!("http_requests_total{{method=\"{method}\",route=\"{route}\",status_class=\"{class}\"}}")
}

pub fn duration_series(suffix: &str, method: &str, route: &str) -> String {
    format!("http_request_duration_seconds_{suffix}{{method=\"{method}\",route=\"{route}\"}}")
}
