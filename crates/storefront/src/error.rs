//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error is rendered as `{success: false, message, requireLogin?}` with a
//! status that classifies it.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use paw_paradise_core::ValidationError;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::catalog::CatalogServiceError;
use crate::services::orders::OrderError;

/// Message for failures whose details stay in the logs.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A submitted field broke a rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The catalog file could not be served.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogServiceError),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// User is not authenticated.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        /// Tell the client to show the login form.
        require_login: bool,
    },

    /// No such route.
    #[error("Not found")]
    NotFound,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(e) => Self::Validation(e),
            OrderError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self::BadRequest("Invalid JSON data".to_owned())
    }
}

/// Wire shape of every failure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    require_login: bool,
}

impl AppError {
    /// Session missing on a route that needs one.
    #[must_use]
    pub fn login_required() -> Self {
        Self::Unauthorized {
            message: "Please login to place an order".to_owned(),
            require_login: true,
        }
    }

    const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Catalog(_)
                | Self::Session(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::Hashing(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) | Self::Catalog(_) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::Repository(_) | AuthError::Hashing(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    // Don't expose internal error details to clients
    fn public_message(&self) -> String {
        if self.is_server_fault() {
            return GENERIC_FAILURE.to_owned();
        }
        match self {
            Self::Auth(AuthError::Validation(e)) | Self::Validation(e) => e.message.to_owned(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid email or password".to_owned(),
            Self::Auth(AuthError::EmailTaken) => {
                "Email already registered. Please login instead.".to_owned()
            }
            Self::Unauthorized { message, .. } | Self::BadRequest(message) => message.clone(),
            Self::NotFound => "Not found".to_owned(),
            Self::MethodNotAllowed => "Invalid request method".to_owned(),
            Self::RateLimited => "Too many attempts. Please wait a moment.".to_owned(),
            _ => GENERIC_FAILURE.to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = FailureBody {
            success: false,
            message: self.public_message(),
            require_login: matches!(
                self,
                Self::Unauthorized {
                    require_login: true,
                    ..
                }
            ),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use paw_paradise_core::validation;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::EmailTaken)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_message_reaches_client() {
        let err = validation::phone("12345").unwrap_err();
        let (status, body) = render(AppError::Validation(err)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Please enter a valid phone number (at least 10 digits)"
            })
        );
    }

    #[tokio::test]
    async fn test_login_required_body() {
        let (status, body) = render(AppError::login_required()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["requireLogin"], true);
        assert_eq!(body["message"], "Please login to place an order");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) =
            render(AppError::Internal("connection refused on 10.0.0.3".to_owned())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], GENERIC_FAILURE);
        assert!(body.get("requireLogin").is_none());
    }

    #[tokio::test]
    async fn test_auth_messages() {
        let (_, body) = render(AppError::Auth(AuthError::InvalidCredentials)).await;
        assert_eq!(body["message"], "Invalid email or password");

        let (_, body) = render(AppError::Auth(AuthError::EmailTaken)).await;
        assert_eq!(
            body["message"],
            "Email already registered. Please login instead."
        );
    }
}
