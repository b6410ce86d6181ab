//! Cross-cutting layers for the router.
use axum::body::Body;
use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::CorsLayer;

/// Mirrors the request origin and allows credentials so the identity
/// cookie works from the web frontend.
pub fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Report submissions and recalls are per-user; never let a proxy cache them.
pub async fn no_store(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
