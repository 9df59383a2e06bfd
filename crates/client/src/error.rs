//! Client error types.
//!
//! [`ApiError`] describes what went wrong on the wire. [`ClientError`] is what
//! the storefront components report upward, classified so that each failure
//! maps to exactly one notice.

use paw_paradise_core::ValidationError;

/// Transport-level failure talking to the storefront server.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a body we could not decode.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server refused the request and said why.
    #[error("rejected with status {status}: {message}")]
    Rejected {
        status: u16,
        message: String,
        require_login: bool,
    },

    /// Non-JSON error response (proxy page, crash, etc.).
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// The backend is not reachable at all.
    #[error("storefront unreachable: {0}")]
    Unreachable(String),
}

/// A failed client operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Input was rejected before anything was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Credentials were refused or a login is required.
    #[error("{0}")]
    Auth(String),

    /// The account already exists.
    #[error("{0}")]
    Conflict(String),

    /// The request did not complete; the caller shows a generic message.
    #[error("network error: {0}")]
    Network(ApiError),

    /// The server handled the request and reported a failure.
    #[error("{0}")]
    Server(String),
}

impl ClientError {
    /// The text shown to the shopper, falling back to `generic` when the
    /// failure carries no message meant for display.
    #[must_use]
    pub fn notice_text(&self, generic: &str) -> String {
        match self {
            Self::Network(_) => generic.to_owned(),
            Self::Validation(e) => e.message.to_owned(),
            Self::Auth(m) | Self::Conflict(m) | Self::Server(m) => m.clone(),
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected {
                status: 401 | 403,
                message,
                ..
            } => Self::Auth(message),
            ApiError::Rejected {
                status: 409,
                message,
                ..
            } => Self::Conflict(message),
            ApiError::Rejected { message, .. } if !message.is_empty() => Self::Server(message),
            other => Self::Network(other),
        }
    }
}
