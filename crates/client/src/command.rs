//! Everything a shopper can do.

use paw_paradise_core::{CategoryFilter, PaymentMethod, ProductId};
use secrecy::SecretString;

use crate::checkout::CheckoutForm;
use crate::panels::Panel;

/// A user intent, handled by [`Storefront::dispatch`](crate::Storefront::dispatch).
#[derive(Debug)]
pub enum Command {
    // Catalog and cart
    AddToCart(ProductId),
    ToggleFavorite(ProductId),
    Increase(ProductId),
    Decrease(ProductId),
    Remove(ProductId),
    AddToCartFromFavorites(ProductId),
    RemoveFavorite(ProductId),
    FilterCategory(CategoryFilter),
    Search(String),

    // Panels
    ToggleSearch,
    ToggleCart,
    ToggleFavoritesPanel,
    OpenLogin,
    OpenSignup,
    CloseModal(Panel),
    CloseAll,

    // Account
    Login {
        email: String,
        password: SecretString,
    },
    Signup {
        name: String,
        email: String,
        password: SecretString,
    },
    Logout,

    // Checkout
    Checkout,
    SelectPayment(PaymentMethod),
    EditCardNumber(String),
    EditExpiry(String),
    EditCvv(String),
    SubmitOrder(CheckoutForm),

    SubscribeNewsletter(String),
}

impl Command {
    /// Variant name, safe to log.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddToCart(_) => "add_to_cart",
            Self::ToggleFavorite(_) => "toggle_favorite",
            Self::Increase(_) => "increase",
            Self::Decrease(_) => "decrease",
            Self::Remove(_) => "remove",
            Self::AddToCartFromFavorites(_) => "add_to_cart_from_favorites",
            Self::RemoveFavorite(_) => "remove_favorite",
            Self::FilterCategory(_) => "filter_category",
            Self::Search(_) => "search",
            Self::ToggleSearch => "toggle_search",
            Self::ToggleCart => "toggle_cart",
            Self::ToggleFavoritesPanel => "toggle_favorites_panel",
            Self::OpenLogin => "open_login",
            Self::OpenSignup => "open_signup",
            Self::CloseModal(_) => "close_modal",
            Self::CloseAll => "close_all",
            Self::Login { .. } => "login",
            Self::Signup { .. } => "signup",
            Self::Logout => "logout",
            Self::Checkout => "checkout",
            Self::SelectPayment(_) => "select_payment",
            Self::EditCardNumber(_) => "edit_card_number",
            Self::EditExpiry(_) => "edit_expiry",
            Self::EditCvv(_) => "edit_cvv",
            Self::SubmitOrder(_) => "submit_order",
            Self::SubscribeNewsletter(_) => "subscribe_newsletter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_passwords() {
        let command = Command::Login {
            email: "jane@paws.io".to_owned(),
            password: SecretString::from("hunter22".to_owned()),
        };
        let debug = format!("{command:?}");
        assert!(debug.contains("jane@paws.io"));
        assert!(!debug.contains("hunter22"));
    }
}
