//! Request-metrics middleware.
//!
//! `track_requests` is mounted per route (see `pipeline`), after routing, so
//! the registered pattern is available through `MatchedPath`. Every request
//! that enters it produces exactly one observation:
//!
//! - normal completion: status class of the response
//! - panic in the inner handler: `5xx`, then the panic is resumed so the
//!   outer catch-panic layer can turn it into a 500
//! - future dropped before completion (timeout, client gone): `cancelled`

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use futures_util::FutureExt;

use simpleweb_core::labels::{method_label, UNMATCHED_ROUTE};
use simpleweb_core::StatusClass;

use crate::obs::metrics::HttpMetrics;

pub async fn track_requests(
    State(metrics): State<Arc<HttpMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());
    let method = method_label(req.method().as_str());

    let mut obs = Observation::start(metrics, method, route);

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => {
            obs.finish(StatusClass::from_status(response.status().as_u16()));
            response
        }
        Err(panic) => {
            obs.finish(StatusClass::ServerError);
            std::panic::resume_unwind(panic)
        }
    }
}

/// One in-flight request. Records on `finish`, or as cancelled when dropped unfinished.
struct Observation {
    metrics: Arc<HttpMetrics>,
    method: &'static str,
    route: String,
    started: Instant,
    done: bool,
}

impl Observation {
    fn start(metrics: Arc<HttpMetrics>, method: &'static str, route: String) -> Self {
        Self {
            metrics,
            method,
            route,
            started: Instant::now(),
            done: false,
        }
    }

    fn finish(&mut self, class: StatusClass) {
        if self.done {
            return;
        }
        self.done = true;
        self.metrics
            .record(self.method, &self.route, class, self.started.elapsed());
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        if !self.done {
            tracing::debug!(method = self.method, route = %self.route, "request dropped before completion");
            self.finish(StatusClass::Cancelled);
        }
    }
}
