//! Request pipeline composition.
//!
//! Application routes are declared as plain `AppRoute`s with no knowledge of
//! instrumentation; `instrument` mounts each one behind `track_requests`.
//! The layer sits on the route's `MethodRouter`, i.e. after path matching, so
//! method dispatch and path-parameter extraction are untouched and the
//! middleware can read the route pattern.

use std::sync::Arc;

use axum::{
    handler::Handler,
    middleware,
    routing::MethodRouter,
    Router,
};

use crate::app_state::AppState;
use crate::obs::metrics::HttpMetrics;
use crate::obs::recorder::track_requests;

/// One application route: a path pattern (e.g. `/hello/:name`) and its handlers.
pub struct AppRoute {
    pub pattern: &'static str,
    pub handler: MethodRouter<AppState>,
}

impl AppRoute {
    pub fn new(pattern: &'static str, handler: MethodRouter<AppState>) -> Self {
        Self { pattern, handler }
    }
}

/// Register every route, in order, wrapped by the request-metrics middleware.
pub fn instrument(routes: Vec<AppRoute>, metrics: Arc<HttpMetrics>) -> Router<AppState> {
    routes.into_iter().fold(Router::new(), |router, r| {
        let layer = middleware::from_fn_with_state(Arc::clone(&metrics), track_requests);
        router.route(r.pattern, r.handler.layer(layer))
    })
}

/// Install an instrumented fallback. Requests reaching it have no route
/// pattern and are recorded under the `unmatched` route label.
pub fn instrument_fallback<H, T>(
    router: Router<AppState>,
    handler: H,
    metrics: Arc<HttpMetrics>,
) -> Router<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    router.fallback(handler.layer(middleware::from_fn_with_state(metrics, track_requests)))
}
