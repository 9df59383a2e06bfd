//! JSON bodies exchanged between the client and the storefront server.
//!
//! All keys are camelCase on the wire. Responses carry a `success` flag and a
//! human-readable `message`. Failures use a 4xx/5xx status with the same
//! `{success: false, message}` shape, plus `requireLogin` when an order was
//! refused for lack of a session.
//!
//! ```text
//! GET  /api/session  -> SessionStatus
//! POST /api/login    LoginRequest  -> AuthResponse
//! POST /api/signup   SignupRequest -> AuthResponse
//! GET  /api/logout   -> LogoutResponse
//! POST /api/orders   OrderRequest  -> OrderResponse
//! GET  /api/catalog  -> [Product]
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Email, OrderId, PaymentMethod, Price, UserId};

/// The logged-in user as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

/// Response of the session check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl SessionStatus {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            logged_in: false,
            user: None,
        }
    }

    #[must_use]
    pub const fn authenticated(user: SessionUser) -> Self {
        Self {
            logged_in: true,
            user: Some(user),
        }
    }
}

/// Body of a login request.
///
/// Missing fields deserialize as empty strings so they fail validation
/// instead of JSON parsing.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of a signup request.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response of login and signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl AuthResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>, user: SessionUser) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: Some(user),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
        }
    }
}

/// Response of logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Body of an order submission.
///
/// Card details are deliberately absent: they are checked client-side only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub total: Price,
    pub payment_method: PaymentMethod,
}

/// Response of an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub require_login: bool,
}

impl OrderResponse {
    #[must_use]
    pub fn placed(order_id: OrderId) -> Self {
        Self {
            success: true,
            message: "Order placed successfully!".to_owned(),
            order_id: Some(order_id),
            require_login: false,
        }
    }

    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            order_id: None,
            require_login: false,
        }
    }

    #[must_use]
    pub fn login_required() -> Self {
        Self {
            success: false,
            message: "Please login to place an order".to_owned(),
            order_id: None,
            require_login: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_status_wire_shape() {
        let anonymous = serde_json::to_value(SessionStatus::anonymous()).unwrap();
        assert_eq!(anonymous, json!({"loggedIn": false}));

        let status: SessionStatus = serde_json::from_value(json!({
            "loggedIn": true,
            "user": {"id": 9, "name": "Jane Doe", "email": "jane@paws.io"}
        }))
        .unwrap();
        assert_eq!(status.user.unwrap().id, UserId::new(9));
    }

    #[test]
    fn test_order_request_uses_camel_case() {
        let request = OrderRequest {
            name: "Jane Doe".to_owned(),
            phone: "1234567890".to_owned(),
            address: "12 Bark St.".to_owned(),
            total: Price::from_cents(2550),
            payment_method: PaymentMethod::Card,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["paymentMethod"], "card");
        assert_eq!(value["total"], 25.5);
    }

    #[test]
    fn test_order_response_omits_defaults() {
        let value = serde_json::to_value(OrderResponse::placed(OrderId::new(17))).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "Order placed successfully!", "orderId": 17})
        );

        let value = serde_json::to_value(OrderResponse::login_required()).unwrap();
        assert_eq!(value["requireLogin"], true);

        let parsed: OrderResponse =
            serde_json::from_value(json!({"success": false, "message": "nope"})).unwrap();
        assert!(!parsed.require_login);
    }

    #[test]
    fn test_credentials_are_redacted_in_debug() {
        let request = LoginRequest {
            email: "jane@paws.io".to_owned(),
            password: "hunter22".to_owned(),
        };
        assert!(!format!("{request:?}").contains("hunter22"));
    }

    #[test]
    fn test_missing_credentials_default_to_empty() {
        let request: SignupRequest = serde_json::from_value(json!({"name": "Jane"})).unwrap();
        assert_eq!(request.name, "Jane");
        assert!(request.email.is_empty());
        assert!(request.password.is_empty());
    }
}
