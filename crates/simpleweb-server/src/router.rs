//! Axum router wiring.
//!
//! Application routes (pages, `/info`) go through the instrumented pipeline.
//! Probe and metrics routes are mounted directly and are not counted.
//!
//! Outer layers, outermost first: catch-panic (500), trace span, request timeout.

use axum::{routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::pipeline::{self, AppRoute};
use crate::{app_state::AppState, ops, pages};

/// Every instrumented route served by the binary.
pub fn app_routes() -> Vec<AppRoute> {
    let mut routes = pages::routes();
    routes.push(AppRoute::new("/info", get(ops::info)));
    routes
}

pub fn build_router(state: AppState) -> Router {
    build_router_with(state, app_routes())
}

/// Build the full router around a caller-supplied set of application routes.
pub fn build_router_with(state: AppState, routes: Vec<AppRoute>) -> Router {
    let metrics = state.metrics();
    let timeout = state.cfg().server.request_timeout();

    let app = pipeline::instrument(routes, metrics.clone());
    let app = pipeline::instrument_fallback(app, pages::not_found, metrics);

    app.route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(ops::panic_response))
}
