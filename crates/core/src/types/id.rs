//! Integer ids for users, products and orders.
//!
//! Each is its own type so a product id can't be passed where an order id is
//! expected. On the wire and in `PostgreSQL` they are plain `INTEGER`s.

macro_rules! integer_ids {
    ($($(#[$doc:meta])* $name:ident),+ $(,)?) => {$(
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[cfg_attr(feature = "postgres", derive(sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    )+};
}

integer_ids! {
    /// Account row id, stored in the session after login.
    UserId,
    /// Catalog entry id, referenced by cart lines and favorites.
    ProductId,
    /// Assigned by the database when an order is stored.
    OrderId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_plain_integers_on_the_wire() {
        assert_eq!(serde_json::to_string(&OrderId::new(42)).unwrap(), "42");

        let id: UserId = serde_json::from_str("3").unwrap();
        assert_eq!(id.as_i32(), 3);
    }

    #[test]
    fn test_display_and_ordering() {
        assert_eq!(ProductId::new(7).to_string(), "7");
        assert!(ProductId::new(2) < ProductId::new(10));
    }
}
