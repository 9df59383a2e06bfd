//! In-process storefront backend.
//!
//! [`MemoryApi`] answers the same requests as the storefront server, applying
//! the server-side validation rules against an in-memory user table. It keeps
//! a single "cookie" session and records every call, so tests can assert on
//! what reached the network.
//!
//! Clones share state: keep one handle for assertions and give the other to
//! the [`Storefront`](crate::Storefront).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use paw_paradise_core::api::{
    AuthResponse, LoginRequest, LogoutResponse, OrderRequest, OrderResponse, SessionStatus,
    SessionUser, SignupRequest,
};
use paw_paradise_core::validation::{self, ShippingDetails};
use paw_paradise_core::{Email, OrderId, Product, UserId};

use super::StorefrontApi;
use crate::error::ApiError;

/// A request that reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Catalog,
    Session,
    Login,
    Signup,
    Logout,
    SubmitOrder,
}

#[derive(Debug)]
struct Account {
    user: SessionUser,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    products: Vec<Product>,
    accounts: Vec<Account>,
    session: Option<UserId>,
    orders: Vec<OrderRequest>,
    calls: Vec<Call>,
    offline: bool,
}

impl State {
    fn user(&self, id: UserId) -> Option<&SessionUser> {
        self.accounts
            .iter()
            .map(|a| &a.user)
            .find(|u| u.id == id)
    }

    fn current_user(&self) -> Option<&SessionUser> {
        self.session.and_then(|id| self.user(id))
    }
}

/// In-memory [`StorefrontApi`].
#[derive(Debug, Clone, Default)]
pub struct MemoryApi {
    state: Arc<Mutex<State>>,
}

fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Rejected {
        status,
        message: message.to_owned(),
        require_login: false,
    }
}

impl MemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `products` from the catalog endpoint.
    #[must_use]
    pub fn with_catalog(self, products: Vec<Product>) -> Self {
        self.lock().products = products;
        self
    }

    /// Register an account that can log in.
    ///
    /// # Panics
    ///
    /// Panics if `email` is not a valid address.
    #[must_use]
    pub fn with_account(self, name: &str, email: &str, password: &str) -> Self {
        {
            let mut state = self.lock();
            let id = next_user_id(&state);
            state.accounts.push(Account {
                user: SessionUser {
                    id,
                    name: name.to_owned(),
                    email: Email::parse(email).expect("test account email must be valid"),
                },
                password: password.to_owned(),
            });
        }
        self
    }

    /// Make every following request fail as if the server were down.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Drop the server-side session, as if it had expired.
    pub fn expire_session(&self) {
        self.lock().session = None;
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// How many times `call` was received.
    #[must_use]
    pub fn count(&self, call: Call) -> usize {
        self.lock().calls.iter().filter(|c| **c == call).count()
    }

    /// Orders accepted so far.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.lock().orders.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and fail if offline.
    fn enter(&self, call: Call) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.offline {
            return Err(ApiError::Unreachable("memory backend is offline".to_owned()));
        }
        Ok(state)
    }
}

fn next_user_id(state: &State) -> UserId {
    let max = state
        .accounts
        .iter()
        .map(|a| a.user.id.as_i32())
        .max()
        .unwrap_or(0);
    UserId::new(max + 1)
}

impl StorefrontApi for MemoryApi {
    async fn catalog(&self) -> Result<Vec<Product>, ApiError> {
        let state = self.enter(Call::Catalog)?;
        Ok(state.products.clone())
    }

    async fn session(&self) -> Result<SessionStatus, ApiError> {
        let state = self.enter(Call::Session)?;
        Ok(state
            .current_user()
            .cloned()
            .map_or_else(SessionStatus::anonymous, SessionStatus::authenticated))
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let mut state = self.enter(Call::Login)?;
        let email = validation::login(&request.email, &request.password)
            .map_err(|e| rejected(400, e.message))?;

        let user = state
            .accounts
            .iter()
            .find(|a| a.user.email == email && a.password == request.password)
            .map(|a| a.user.clone())
            .ok_or_else(|| rejected(401, "Invalid email or password"))?;

        state.session = Some(user.id);
        Ok(AuthResponse::ok("Login successful!", user))
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        let mut state = self.enter(Call::Signup)?;
        let valid = validation::signup(&request.name, &request.email, &request.password)
            .map_err(|e| rejected(400, e.message))?;

        if state.accounts.iter().any(|a| a.user.email == valid.email) {
            return Err(rejected(
                409,
                "Email already registered. Please login instead.",
            ));
        }

        let user = SessionUser {
            id: next_user_id(&state),
            name: valid.name,
            email: valid.email,
        };
        state.accounts.push(Account {
            user: user.clone(),
            password: request.password.clone(),
        });
        state.session = Some(user.id);
        Ok(AuthResponse::ok("Account created successfully!", user))
    }

    async fn logout(&self) -> Result<LogoutResponse, ApiError> {
        let mut state = self.enter(Call::Logout)?;
        state.session = None;
        Ok(LogoutResponse {
            success: true,
            message: "Logged out successfully".to_owned(),
        })
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResponse, ApiError> {
        let mut state = self.enter(Call::SubmitOrder)?;
        if state.current_user().is_none() {
            return Err(ApiError::Rejected {
                status: 401,
                message: "Please login to place an order".to_owned(),
                require_login: true,
            });
        }

        let shipping = ShippingDetails {
            name: request.name.clone(),
            phone: request.phone.clone(),
            address: request.address.clone(),
        };
        validation::order(&shipping, request.total, request.payment_method.as_str())
            .map_err(|e| rejected(400, e.message))?;

        state.orders.push(request.clone());
        let id = i32::try_from(state.orders.len()).unwrap_or(i32::MAX);
        Ok(OrderResponse::placed(OrderId::new(id)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use paw_paradise_core::{PaymentMethod, Price};

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_login_sets_session() {
        let api = MemoryApi::new().with_account("Jane Doe", "jane@paws.io", "hunter22");
        assert!(!api.session().await.unwrap().logged_in);

        let response = api
            .login(&login_request(" jane@paws.io ", "hunter22"))
            .await
            .unwrap();
        assert!(response.success);
        assert!(api.session().await.unwrap().logged_in);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let api = MemoryApi::new().with_account("Jane Doe", "jane@paws.io", "hunter22");
        let err = api
            .login(&login_request("jane@paws.io", "wrong1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let api = MemoryApi::new().with_account("Jane Doe", "jane@paws.io", "hunter22");
        let err = api
            .signup(&SignupRequest {
                name: "Jane Again".to_owned(),
                email: "jane@paws.io".to_owned(),
                password: "secret1".to_owned(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_order_without_session_requires_login() {
        let api = MemoryApi::new();
        let err = api
            .submit_order(&OrderRequest {
                name: "Jane Doe".to_owned(),
                phone: "1234567890".to_owned(),
                address: "12 Bark Street".to_owned(),
                total: Price::from_cents(1000),
                payment_method: PaymentMethod::Cod,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Rejected {
                require_login: true,
                ..
            }
        ));
        assert!(api.orders().is_empty());
    }

    #[tokio::test]
    async fn test_offline_calls_are_recorded() {
        let api = MemoryApi::new();
        api.set_offline(true);
        assert!(matches!(
            api.catalog().await,
            Err(ApiError::Unreachable(_))
        ));
        assert_eq!(api.calls(), vec![Call::Catalog]);
    }
}
