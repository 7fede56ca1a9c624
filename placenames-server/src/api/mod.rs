//! HTTP API for the place-name index.

pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::{header, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use handlers::AppState;

/// `Cache-Control` for lookups: the index never changes while the process
/// runs, so responses may be cached for 28 days.
pub const CACHE_CONTROL: &str = "public, max-age=2419200, immutable";

/// Builds the Axum router with all routes and middleware layers.
///
/// The middleware stack (outermost to innermost): CORS → Trace.
/// Lookup routes also carry request metrics and a fixed `Cache-Control`
/// header; `/healthz` and `/metrics` carry neither.
pub fn create_router(state: AppState) -> Router {
    let lookups = Router::new()
        .route("/v1/place-names/prefix", get(handlers::top))
        .route("/v1/place-names/prefix/", get(handlers::top))
        .route("/v1/place-names/prefix/:query", get(handlers::prefix))
        .route_layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL),
        ))
        .route_layer(middleware::from_fn(metrics_middleware));

    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(lookups)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Counts and times a lookup, labelled by its route template rather than
/// the raw path.
async fn metrics_middleware(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let start = Instant::now();
    let response = next.run(req).await;
    metrics::record_request(&method, &path, response.status().as_u16(), start.elapsed());
    response
}
