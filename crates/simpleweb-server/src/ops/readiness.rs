//! Readiness gate.
//!
//! Starts closed. `main` opens it once the listener is bound and closes it
//! again when shutdown begins, so the orchestrator stops routing traffic while
//! in-flight requests drain.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use simpleweb_core::WebError;

#[derive(Debug, Default)]
pub struct ReadinessGate {
    ready: AtomicBool,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ready(&self, ready: bool) {
        let prev = self.ready.swap(ready, Ordering::AcqRel);
        if prev != ready {
            tracing::info!(ready, "readiness changed");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Build the `/readyz` response. A missing gate reads as not ready.
pub fn readiness_response(gate: Option<&ReadinessGate>) -> Response {
    match gate {
        Some(g) if g.is_ready() => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"ready": true}"#,
        )
            .into_response(),
        _ => super::error_response(&WebError::NotReady),
    }
}
