//! Why a login or signup was refused.

use thiserror::Error;

use paw_paradise_core::ValidationError;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// First field rule the request broke.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown email and wrong password look the same from outside.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// argon2 could not produce a hash (never a shopper's fault).
    #[error("password hashing failed: {0}")]
    Hashing(String),
}
