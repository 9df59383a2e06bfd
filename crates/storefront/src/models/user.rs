//! User domain types.

use chrono::{DateTime, Utc};

use paw_paradise_core::api::SessionUser;
use paw_paradise_core::{Email, UserId};

/// A shopper account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name, trimmed at signup.
    pub name: String,
    /// Login email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
