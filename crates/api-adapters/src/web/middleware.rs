//! forum/crates/api-adapters/src/web/middleware.rs Middleware
//!
//! Access logging, request ids, CORS and the request deadline.

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, Method, Request};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const REQUEST_ID: &str = "x-request-id";

/// Wraps `router` in the standard middleware stack.
///
/// Order, outermost first: a request id is assigned (or the caller's kept),
/// the access-log span records it, the id is echoed on the response, CORS is
/// answered, and finally the handler runs under `request_timeout`.
pub fn standard_layers(router: Router, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(access_span))
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(cors_policy())
            .layer(TimeoutLayer::new(request_timeout)),
    )
}

fn access_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}

// Any origin may call the API with GET and POST; preflights are cached for an hour.
pub fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}
