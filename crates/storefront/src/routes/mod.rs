//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the database)
//!
//! # Account (strict rate limit on login/signup)
//! GET  /api/session            - Who is logged in
//! POST /api/login              - Log in with email and password
//! POST /api/signup             - Create an account and log in
//! GET  /api/logout             - End the session
//!
//! # Shop
//! GET  /api/catalog            - Product catalog
//! POST /api/orders             - Place an order (requires login)
//! ```

pub mod api;
pub mod health;

use axum::{
    Router,
    middleware::map_response,
    routing::{get, post},
};

use crate::error::AppError;
use crate::middleware::{api_rate_limiter, auth_rate_limiter, rate_limit_body};
use crate::state::AppState;

/// Create the login and signup routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(api::account::login))
        .route("/signup", post(api::account::signup))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(auth_rate_limiter())
        .layer(map_response(rate_limit_body))
}

/// Create the remaining API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(api::account::session))
        .route("/logout", get(api::account::logout))
        .route("/catalog", get(api::catalog::catalog))
        .route("/orders", post(api::orders::submit))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(api_rate_limiter())
        .layer(map_response(rate_limit_body))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", auth_routes().merge(api_routes()))
        .fallback(not_found)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found() -> AppError {
    AppError::NotFound
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use crate::config::StorefrontConfig;
    use crate::middleware::session_layer;

    fn app() -> Router {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/paw_paradise_test"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: url::Url::parse("http://localhost:3000").unwrap(),
            session_secret: SecretString::from("k3J9x!pQ2#vL8mZ4@wR7tY1&nB6cF0hD"),
            catalog_path: Path::new(env!("CARGO_MANIFEST_DIR")).join("catalog/products.json"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        // Never connects unless a handler reaches the database
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/paw_paradise_test")
            .unwrap();

        routes()
            .layer(session_layer(MemoryStore::default(), false))
            .with_state(AppState::new(config, pool))
    }

    fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.10");
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_owned()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_anonymous_session() {
        let (status, body) = send(app(), request("GET", "/api/session", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"loggedIn": false}));
    }

    #[tokio::test]
    async fn test_order_without_session_requires_login() {
        let (status, body) = send(
            app(),
            request("POST", "/api/orders", Some(r#"{"name": "Jane Doe"}"#)),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Please login to place an order",
                "requireLogin": true
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_login_body() {
        let (status, body) = send(app(), request("POST", "/api/login", Some("{nope"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid JSON data");
    }

    #[tokio::test]
    async fn test_login_validates_before_lookup() {
        let (status, body) = send(
            app(),
            request(
                "POST",
                "/api/login",
                Some(r#"{"email": "not-an-email", "password": "hunter22"}"#),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Please enter a valid email address");

        let (status, body) = send(
            app(),
            request("POST", "/api/login", Some(r#"{"email": "jane@paws.io"}"#)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Please enter your password");
    }

    #[tokio::test]
    async fn test_signup_name_rules() {
        let (status, body) = send(
            app(),
            request(
                "POST",
                "/api/signup",
                Some(r#"{"name": "R2D2 Unit", "email": "r2@paws.io", "password": "beepboop"}"#),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Name can only contain letters and spaces");
    }

    #[tokio::test]
    async fn test_logout_always_succeeds() {
        let (status, body) = send(app(), request("GET", "/api/logout", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Logged out successfully"})
        );
    }

    #[tokio::test]
    async fn test_catalog_is_served() {
        let response = app()
            .oneshot(request("GET", "/api/catalog", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=60"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let products: Vec<paw_paradise_core::Product> = serde_json::from_slice(&bytes).unwrap();
        assert!(!products.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_method_and_unknown_path() {
        let (status, body) = send(app(), request("DELETE", "/api/session", None)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["message"], "Invalid request method");

        let (status, body) = send(app(), request("GET", "/api/nope", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_login_is_rate_limited() {
        let app = app();
        let attempt = || {
            request(
                "POST",
                "/api/login",
                Some(r#"{"email": "bad", "password": "x"}"#),
            )
        };
        for _ in 0..5 {
            let (status, _) = send(app.clone(), attempt()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        let (status, body) = send(app, attempt()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(request("GET", "/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
