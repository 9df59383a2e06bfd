//! Security headers for a JSON-only API.
//!
//! Nothing served here is meant to render as a document, so the content
//! policy forbids every fetch and the responses refuse framing.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, header::CACHE_CONTROL},
    middleware::Next,
    response::Response,
};

const POLICY: &[(&str, &str)] = &[
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    (
        "content-security-policy",
        "default-src 'none'; frame-ancestors 'none'",
    ),
    ("cross-origin-resource-policy", "same-origin"),
];

/// Session and order answers are per-shopper.
const NO_STORE: &str = "no-store, max-age=0";

/// Stamp [`POLICY`] on every response. Handlers that choose a
/// `Cache-Control` (the catalog) keep it; everything else is `no-store`.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for &(name, value) in POLICY {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
        .entry(CACHE_CONTROL)
        .or_insert(HeaderValue::from_static(NO_STORE));

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/api/session", get(|| async { "{}" }))
            .route(
                "/api/catalog",
                get(|| async { ([(CACHE_CONTROL, "public, max-age=60")], "[]") }),
            )
            .layer(axum::middleware::from_fn(security_headers_middleware))
    }

    async fn headers(uri: &str) -> axum::http::HeaderMap {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.headers().clone()
    }

    #[tokio::test]
    async fn test_policy_applied() {
        let headers = headers("/api/session").await;
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers[CACHE_CONTROL], NO_STORE);
    }

    #[tokio::test]
    async fn test_handler_cache_control_kept() {
        let headers = headers("/api/catalog").await;
        assert_eq!(headers[CACHE_CONTROL], "public, max-age=60");
        assert_eq!(headers["referrer-policy"], "no-referrer");
    }
}
