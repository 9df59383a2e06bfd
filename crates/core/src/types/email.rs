//! Shopper email addresses.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `local@domain.tld`, with a TLD of two or more letters.
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .unwrap_or_else(|e| unreachable!("email pattern is a valid regex: {e}"))
});

/// RFC 5321 path limit.
const MAX_LEN: usize = 254;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most 254 characters")]
    TooLong,
    #[error("email is not a valid address")]
    Malformed,
}

/// A trimmed address that passed the storefront's email rule.
///
/// Case is kept as typed: accounts are looked up by the exact address.
///
/// ```
/// use paw_paradise_core::Email;
///
/// assert_eq!(Email::parse(" jane@paws.io ").unwrap().as_str(), "jane@paws.io");
/// assert!(Email::parse("jane@paws").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// # Errors
    ///
    /// `Empty` for blank input, `TooLong` past 254 characters, otherwise
    /// `Malformed` if the address pattern does not match.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        match input.trim() {
            "" => Err(EmailError::Empty),
            s if s.len() > MAX_LEN => Err(EmailError::TooLong),
            s if ADDRESS.is_match(s) => Ok(Self(s.to_owned())),
            _ => Err(EmailError::Malformed),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

// Bound as TEXT; rows are read back as strings and re-parsed.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Email {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}
