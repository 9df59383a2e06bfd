//! The storefront application.
//!
//! [`Storefront`] owns every component and is the only place that mutates
//! them. Each [`Command`] runs to completion inside [`Storefront::dispatch`],
//! which then re-renders the whole view.

use paw_paradise_core::validation::{self, messages};
use paw_paradise_core::{Email, ProductId};
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use crate::api::StorefrontApi;
use crate::auth::AuthSession;
use crate::cart::CartLedger;
use crate::catalog::{CatalogStore, Listing};
use crate::checkout::{
    Blocked, CardInput, CheckoutForm, CheckoutOrchestrator, CheckoutStage, EMPTY_CART, Outcome,
};
use crate::command::Command;
use crate::error::ClientError;
use crate::favorites::{FavoritesSet, Toggled};
use crate::notice::Notice;
use crate::panels::{Panel, Panels};
use crate::view::{self, StoreView};

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
pub const LOGGED_OUT: &str = "Logged out successfully";

pub struct Storefront<A> {
    api: A,
    catalog: CatalogStore,
    cart: CartLedger,
    favorites: FavoritesSet,
    auth: AuthSession,
    checkout: CheckoutOrchestrator,
    panels: Panels,
    listing: Listing,
    card_input: CardInput,
    notice: Option<Notice>,
}

impl<A: StorefrontApi> Storefront<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            catalog: CatalogStore::new(),
            cart: CartLedger::new(),
            favorites: FavoritesSet::new(),
            auth: AuthSession::new(),
            checkout: CheckoutOrchestrator::new(),
            panels: Panels::new(),
            listing: Listing::default(),
            card_input: CardInput::default(),
            notice: None,
        }
    }

    /// Load the catalog and restore the server session.
    pub async fn start(&mut self) -> StoreView {
        self.catalog.load(&self.api).await;
        self.auth.check_session(&self.api).await;
        self.render()
    }

    /// Apply `command` and return the new view.
    #[instrument(skip_all, fields(command = command.name()))]
    pub async fn dispatch(&mut self, command: Command) -> StoreView {
        self.notice = None;

        match command {
            Command::AddToCart(id) | Command::AddToCartFromFavorites(id) => self.add_to_cart(id),
            Command::ToggleFavorite(id) => self.toggle_favorite(id),
            Command::Increase(id) => {
                self.cart.change_quantity(id, 1);
            }
            Command::Decrease(id) => {
                self.cart.change_quantity(id, -1);
            }
            Command::Remove(id) => {
                self.cart.remove(id);
            }
            Command::RemoveFavorite(id) => {
                if self.favorites.remove(id) {
                    self.notice = Some(Notice::success(format!(
                        "{} removed from favorites",
                        self.product_name(id)
                    )));
                }
            }
            Command::FilterCategory(filter) => self.listing = Listing::Category(filter),
            Command::Search(term) => self.listing = Listing::Search(term.trim().to_owned()),

            Command::ToggleSearch => {
                self.panels.toggle(Panel::Search);
            }
            Command::ToggleCart => {
                let opened = self.panels.toggle(Panel::Cart);
                // The checkout modal owns the stage while it is up
                if !self.panels.is_open(Panel::Checkout) {
                    if opened {
                        self.checkout.review();
                    } else {
                        self.checkout.close();
                    }
                }
            }
            Command::ToggleFavoritesPanel => {
                self.panels.toggle(Panel::Favorites);
            }
            Command::OpenLogin => self.panels.open(Panel::Login),
            Command::OpenSignup => self.panels.open(Panel::Signup),
            Command::CloseModal(panel) => {
                self.panels.close(panel);
                if matches!(panel, Panel::Cart | Panel::Checkout)
                    && !self.panels.is_open(Panel::Checkout)
                {
                    self.checkout.close();
                }
            }
            Command::CloseAll => {
                self.panels.close_all();
                self.checkout.close();
            }

            Command::Login { email, password } => {
                self.login(&email, password.expose_secret()).await;
            }
            Command::Signup {
                name,
                email,
                password,
            } => self.signup(&name, &email, password.expose_secret()).await,
            Command::Logout => self.logout().await,

            Command::Checkout => self.begin_checkout(),
            Command::SelectPayment(method) => self.checkout.select_payment(method),
            Command::EditCardNumber(input) => {
                self.card_input.number = validation::format_card_number(&input);
            }
            Command::EditExpiry(input) => {
                let digits: String = validation::digits_only(&input).chars().take(4).collect();
                self.card_input.expiry = validation::format_expiry(&digits);
            }
            Command::EditCvv(input) => {
                self.card_input.cvv = validation::digits_only(&input).chars().take(3).collect();
            }
            Command::SubmitOrder(form) => self.submit_order(&form).await,

            Command::SubscribeNewsletter(email) => {
                self.notice = Some(match Email::parse(&email) {
                    Ok(email) => Notice::success(format!("Thanks for subscribing with {email}!")),
                    Err(_) => Notice::error(messages::INVALID_EMAIL),
                });
            }
        }

        self.leave_form_without_modal();
        self.render()
    }

    /// The form stage lasts exactly as long as the checkout modal is open,
    /// whichever command closed it (another modal opening replaces it).
    fn leave_form_without_modal(&mut self) {
        if self.checkout.stage() == CheckoutStage::Form && !self.panels.is_open(Panel::Checkout) {
            self.checkout.close();
        }
    }

    fn product_name(&self, id: ProductId) -> String {
        self.catalog
            .find(id)
            .map_or_else(|| format!("Product #{id}"), |p| p.name.clone())
    }

    fn add_to_cart(&mut self, id: ProductId) {
        if self.cart.add(self.catalog.catalog(), id).is_some() {
            self.notice = Some(Notice::success(format!(
                "{} added to cart!",
                self.product_name(id)
            )));
        } else {
            warn!(%id, "Ignoring unknown product");
        }
    }

    fn toggle_favorite(&mut self, id: ProductId) {
        let message = match self.favorites.toggle(self.catalog.catalog(), id) {
            Some(Toggled::Added) => format!("{} added to favorites!", self.product_name(id)),
            Some(Toggled::Removed) => format!("{} removed from favorites", self.product_name(id)),
            None => {
                warn!(%id, "Ignoring unknown product");
                return;
            }
        };
        self.notice = Some(Notice::success(message));
    }

    async fn login(&mut self, email: &str, password: &str) {
        self.notice = Some(match self.auth.login(&self.api, email, password).await {
            Ok(user) => {
                self.panels.close(Panel::Login);
                Notice::success(format!("Welcome back, {}!", user.name))
            }
            Err(e) => failure_notice(&e, LOGIN_FAILED),
        });
    }

    async fn signup(&mut self, name: &str, email: &str, password: &str) {
        self.notice = Some(
            match self.auth.signup(&self.api, name, email, password).await {
                Ok(user) => {
                    self.panels.close(Panel::Signup);
                    Notice::success(format!("Welcome to PawParadise, {}!", user.name))
                }
                Err(e) => failure_notice(&e, SIGNUP_FAILED),
            },
        );
    }

    async fn logout(&mut self) {
        self.checkout.abandon();
        self.panels.close(Panel::Checkout);
        self.auth.logout(&self.api).await;
        self.notice = Some(Notice::success(LOGGED_OUT));
    }

    fn begin_checkout(&mut self) {
        match self
            .checkout
            .begin(self.cart.is_empty(), self.auth.is_authenticated())
        {
            Ok(()) => {
                self.panels.close(Panel::Cart);
                self.panels.open(Panel::Checkout);
            }
            Err(blocked @ Blocked::EmptyCart) => {
                self.notice = Some(Notice::error(blocked.to_string()));
            }
            Err(blocked @ Blocked::LoginRequired) => {
                self.panels.close(Panel::Cart);
                self.panels.open(Panel::Login);
                self.notice = Some(Notice::error(blocked.to_string()));
            }
        }
    }

    async fn submit_order(&mut self, form: &CheckoutForm) {
        if self.cart.is_empty() {
            self.notice = Some(Notice::error(EMPTY_CART));
            return;
        }

        let total = self.cart.total(self.catalog.catalog());
        let submission = match self.checkout.submit(form, &self.card_input, total) {
            Ok(submission) => submission,
            Err(e) => {
                self.notice = Some(Notice::error(e.to_string()));
                return;
            }
        };

        let result = self.api.submit_order(&submission.request).await;
        let Some(outcome) = self.checkout.complete(submission.ticket, result) else {
            debug!("Order completion superseded");
            return;
        };

        match &outcome {
            Outcome::Placed { .. } => {
                self.cart.clear();
                self.card_input = CardInput::default();
                self.panels.close(Panel::Checkout);
                self.panels.close(Panel::Cart);
            }
            Outcome::LoginRequired(_) => {
                self.auth.expire();
                self.panels.close(Panel::Checkout);
                self.panels.open(Panel::Login);
            }
            Outcome::Rejected(_) | Outcome::Failed => {}
        }
        self.notice = Some(outcome.notice());
    }
}

fn failure_notice(err: &ClientError, generic: &str) -> Notice {
    if let ClientError::Network(e) = err {
        warn!(error = %e, "Request failed");
    }
    Notice::error(err.notice_text(generic))
}

impl<A> Storefront<A> {
    /// Rebuild the view from current state.
    #[must_use]
    pub fn render(&self) -> StoreView {
        view::render(self)
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartLedger {
        &self.cart
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthSession {
        &self.auth
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutOrchestrator {
        &self.checkout
    }

    #[must_use]
    pub const fn panels(&self) -> &Panels {
        &self.panels
    }

    #[must_use]
    pub const fn listing(&self) -> &Listing {
        &self.listing
    }

    #[must_use]
    pub const fn card_input(&self) -> &CardInput {
        &self.card_input
    }

    /// Notice produced by the last command, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}
