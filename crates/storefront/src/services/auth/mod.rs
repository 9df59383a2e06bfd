//! Authentication service.
//!
//! Password accounts hashed with argon2.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;

use sqlx::PgPool;
use tracing::{info, instrument};

use paw_paradise_core::validation;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with name, email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field breaks a signup rule.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let valid = validation::signup(name, email, password)?;

        if self.users.email_exists(&valid.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;

        // A concurrent signup can still win the race; the unique index catches it.
        let user = self
            .users
            .create(&valid.name, &valid.email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the email is malformed or the password empty.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = validation::login(email, password)?;

        let Some((user, password_hash)) = self.users.get_password_hash(&email).await? else {
            return Err(unknown_account(password));
        };

        verify_password(password, &password_hash)?;

        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }
}

/// Checked when no account matches the email.
static DECOY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("no account signs in with this").ok());

/// Unknown email: run the same argon2 verification a wrong password gets,
/// so response time does not reveal which emails are registered.
fn unknown_account(password: &str) -> AuthError {
    DECOY_HASH
        .as_deref()
        .and_then(|hash| verify_password(password, hash).err())
        .unwrap_or(AuthError::InvalidCredentials)
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
