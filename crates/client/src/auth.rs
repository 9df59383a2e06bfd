//! Client mirror of the server session.
//!
//! The server is the source of truth; this only remembers who it said we are.

use paw_paradise_core::api::{LoginRequest, SessionUser, SignupRequest};
use paw_paradise_core::validation;
use tracing::{info, instrument, warn};

use crate::api::StorefrontApi;
use crate::error::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(SessionUser),
}

#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    state: AuthState,
}

impl AuthSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&SessionUser> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Anonymous => None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// Ask the server who we are.
    ///
    /// Any failure leaves the session anonymous.
    #[instrument(skip_all)]
    pub async fn check_session<A: StorefrontApi>(&mut self, api: &A) -> &AuthState {
        self.state = match api.session().await {
            Ok(status) => match status.user {
                Some(user) if status.logged_in => AuthState::Authenticated(user),
                _ => AuthState::Anonymous,
            },
            Err(e) => {
                warn!(error = %e, "Session check failed");
                AuthState::Anonymous
            }
        };
        &self.state
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` without a request when the form is
    /// invalid, otherwise the classified server or network failure.
    #[instrument(skip(self, api, password))]
    pub async fn login<A: StorefrontApi>(
        &mut self,
        api: &A,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, ClientError> {
        let email = validation::login_form(email, password)?;
        let request = LoginRequest {
            email: email.into_inner(),
            password: password.to_owned(),
        };
        let response = api.login(&request).await?;
        self.accept(response.success, response.message, response.user)
    }

    /// Create an account and log in as it.
    ///
    /// # Errors
    ///
    /// Same as [`AuthSession::login`]; an existing account yields
    /// `ClientError::Conflict`.
    #[instrument(skip(self, api, password))]
    pub async fn signup<A: StorefrontApi>(
        &mut self,
        api: &A,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, ClientError> {
        let valid = validation::signup_form(name, email, password)?;
        let request = SignupRequest {
            name: valid.name,
            email: valid.email.into_inner(),
            password: password.to_owned(),
        };
        let response = api.signup(&request).await?;
        self.accept(response.success, response.message, response.user)
    }

    /// End the session.
    ///
    /// Local state is cleared even if the server cannot be reached.
    #[instrument(skip_all)]
    pub async fn logout<A: StorefrontApi>(&mut self, api: &A) {
        if let Err(e) = api.logout().await {
            warn!(error = %e, "Logout request failed; clearing local session anyway");
        }
        self.state = AuthState::Anonymous;
    }

    /// The server reported that our session is gone.
    pub fn expire(&mut self) {
        self.state = AuthState::Anonymous;
    }

    fn accept(
        &mut self,
        success: bool,
        message: String,
        user: Option<SessionUser>,
    ) -> Result<SessionUser, ClientError> {
        match user {
            Some(user) if success => {
                info!(user_id = %user.id, "Signed in");
                self.state = AuthState::Authenticated(user.clone());
                Ok(user)
            }
            _ => Err(ClientError::Server(message)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MemoryApi;
    use crate::api::memory::Call;

    fn api() -> MemoryApi {
        MemoryApi::new().with_account("Jane Doe", "jane@paws.io", "hunter22")
    }

    #[tokio::test]
    async fn test_login_authenticates() {
        let api = api();
        let mut auth = AuthSession::new();
        let user = auth.login(&api, "jane@paws.io", "hunter22").await.unwrap();
        assert_eq!(user.name, "Jane Doe");
        assert!(auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let api = api();
        let mut auth = AuthSession::new();

        let err = auth.login(&api, "jane@", "hunter22").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = auth.login(&api, "jane@paws.io", "short").await.unwrap_err();
        assert_eq!(
            err.notice_text(""),
            "Password must be at least 6 characters"
        );
        assert_eq!(api.count(Call::Login), 0);
    }

    #[tokio::test]
    async fn test_wrong_password_is_auth_error() {
        let api = api();
        let mut auth = AuthSession::new();
        let err = auth.login(&api, "jane@paws.io", "wrong12").await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(m) if m == "Invalid email or password"));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_conflict() {
        let api = api();
        let mut auth = AuthSession::new();
        let err = auth
            .signup(&api, "Jane Again", "jane@paws.io", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_signup_logs_in() {
        let api = MemoryApi::new();
        let mut auth = AuthSession::new();
        auth.signup(&api, "  Max Bark ", "max@paws.io", "woofwoof")
            .await
            .unwrap();
        assert_eq!(auth.current_user().unwrap().name, "Max Bark");
        assert!(api.session().await.unwrap().logged_in);
    }

    #[tokio::test]
    async fn test_check_session_falls_back_to_anonymous() {
        let api = api();
        let mut auth = AuthSession::new();
        auth.login(&api, "jane@paws.io", "hunter22").await.unwrap();

        api.set_offline(true);
        assert_eq!(*auth.check_session(&api).await, AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_offline() {
        let api = api();
        let mut auth = AuthSession::new();
        auth.login(&api, "jane@paws.io", "hunter22").await.unwrap();

        api.set_offline(true);
        auth.logout(&api).await;
        assert!(!auth.is_authenticated());
    }
}
