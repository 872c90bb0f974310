//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/readyz`  : readiness (503 until the gate opens, and again while draining)
//! - `/metrics` : Prometheus text format
//! - `/info`    : build and runtime report

pub mod info;
pub mod readiness;

use std::any::Any;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use simpleweb_core::WebError;

use crate::app_state::AppState;
use self::info::{format_uptime, InfoReport};

/// Liveness never touches shared state.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"alive": true}"#,
    )
}

pub async fn readyz(State(state): State<AppState>) -> Response {
    readiness::readiness_response(Some(state.readiness().as_ref()))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let extra = state.metrics_extra();
    match state.metrics().render(&extra) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics exposition failed");
            error_response(&e)
        }
    }
}

pub async fn info(State(state): State<AppState>) -> Response {
    let report = InfoReport {
        build: state.build_info(),
        run_time: format_uptime(state.uptime()),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => error_response(&WebError::Internal(format!("info serialization failed: {e}"))),
    }
}

/// Header carrying the stable `ErrorCode` on error responses.
pub const ERROR_CODE_HEADER: &str = "x-error-code";

/// Plain-text error response: canonical reason in the body, stable code in [`ERROR_CODE_HEADER`].
pub fn error_response(err: &WebError) -> Response {
    let code = err.code();
    let status =
        StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::HeaderName::from_static(ERROR_CODE_HEADER), code.as_str()),
        ],
        status.canonical_reason().unwrap_or("error"),
    )
        .into_response()
}

/// Response for a handler panic caught by the outermost layer.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    };
    tracing::error!(%detail, "request handler panicked");
    error_response(&WebError::Internal(detail))
}
