//! Session, login, signup and logout endpoints.

use axum::{Json, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use paw_paradise_core::api::{
    AuthResponse, LoginRequest, LogoutResponse, SessionStatus, SessionUser, SignupRequest,
};

use super::ApiJson;
use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::state::AppState;

/// Report who the session belongs to.
///
/// GET /api/session
pub async fn session(OptionalAuth(user): OptionalAuth) -> Json<SessionStatus> {
    Json(user.map_or_else(SessionStatus::anonymous, |user| {
        SessionStatus::authenticated(user.into())
    }))
}

/// Log in with email and password.
///
/// POST /api/login
///
/// # Errors
///
/// 400 for a malformed email or empty password, 401 for unknown email or wrong
/// password (same message for both).
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .auth()
        .login(&request.email, &request.password)
        .await?;

    let user = start_session(&session, &user).await?;
    add_breadcrumb("auth", "Logged in", None);

    Ok(Json(AuthResponse::ok("Login successful!", user)))
}

/// Create an account and log in as it.
///
/// POST /api/signup
///
/// # Errors
///
/// 400 for the first broken field rule, 409 if the email is already registered.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .auth()
        .register(&request.name, &request.email, &request.password)
        .await?;

    let user = start_session(&session, &user).await?;
    add_breadcrumb("auth", "Signed up", None);

    Ok(Json(AuthResponse::ok("Account created successfully!", user)))
}

/// End the session.
///
/// GET /api/logout
///
/// # Errors
///
/// 500 if the session store cannot delete the session.
pub async fn logout(session: Session) -> Result<Json<LogoutResponse>> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(Json(LogoutResponse {
        success: true,
        message: "Logged out successfully".to_owned(),
    }))
}

async fn start_session(session: &Session, user: &User) -> Result<SessionUser> {
    let current = CurrentUser::from(user);
    set_current_user(session, &current).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(current.into())
}
