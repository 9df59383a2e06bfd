//! Presentation snapshot.
//!
//! [`render`] derives everything the screen shows from the components. Nothing
//! here is stored; the view is rebuilt after every command so counters, grid
//! and panels cannot drift apart.

use paw_paradise_core::validation::CardNumberHint;
use paw_paradise_core::{PaymentMethod, Product, ProductId};

use crate::notice::Notice;
use crate::panels::Panel;
use crate::storefront::Storefront;

/// Header badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderView {
    pub cart_count: u32,
    pub favorites_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthView {
    /// Show login and signup buttons.
    Guest,
    SignedIn { name: String },
}

/// A product in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub emoji: String,
    pub category: &'static str,
    pub price: String,
    pub old_price: Option<String>,
    pub badge: Option<String>,
    pub is_favorite: bool,
}

/// A product in the favorites panel and favorites section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteItem {
    pub id: ProductId,
    pub name: String,
    pub emoji: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub emoji: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub total: String,
    pub is_empty: bool,
}

/// Live card-field preview.
#[derive(Clone, PartialEq, Eq)]
pub struct CardPreview {
    pub number: String,
    pub expiry: String,
    pub hint: CardNumberHint,
}

impl std::fmt::Debug for CardPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardPreview")
            .field("number", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("hint", &self.hint)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutView {
    pub subtotal: String,
    pub total: String,
    pub payment_method: PaymentMethod,
    pub submit_label: &'static str,
    pub submitting: bool,
    /// Present when paying by card.
    pub card: Option<CardPreview>,
}

/// Everything on screen after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreView {
    pub header: HeaderView,
    pub auth: AuthView,
    pub products: Vec<ProductCard>,
    pub favorites: Vec<FavoriteItem>,
    pub cart: CartView,
    /// Present while the checkout panel is open.
    pub checkout: Option<CheckoutView>,
    pub open_panels: Vec<Panel>,
    pub notice: Option<Notice>,
}

impl StoreView {
    #[must_use]
    pub fn is_open(&self, panel: Panel) -> bool {
        self.open_panels.contains(&panel)
    }
}

/// Build the view for `store`.
#[must_use]
pub fn render<A>(store: &Storefront<A>) -> StoreView {
    let catalog = store.catalog().catalog();
    let cart = store.cart();
    let favorites = store.favorites();

    let products = store
        .catalog()
        .list(store.listing())
        .into_iter()
        .map(|p| product_card(p, favorites.contains(p.id)))
        .collect();

    let favorite_items = favorites
        .products(catalog)
        .into_iter()
        .map(|p| FavoriteItem {
            id: p.id,
            name: p.name.clone(),
            emoji: p.emoji.clone(),
            price: p.price.to_string(),
        })
        .collect();

    let lines = cart
        .resolved(catalog)
        .map(|(product, line)| CartLineView {
            id: product.id,
            name: product.name.clone(),
            emoji: product.emoji.clone(),
            unit_price: product.price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total(product).to_string(),
        })
        .collect();
    let total = cart.total(catalog).to_string();

    let checkout = store.panels().is_open(Panel::Checkout).then(|| {
        let orchestrator = store.checkout();
        let method = orchestrator.payment_method();
        let submitting = orchestrator.is_submitting();
        let input = store.card_input();
        CheckoutView {
            subtotal: total.clone(),
            total: total.clone(),
            payment_method: method,
            submit_label: if submitting {
                "Processing..."
            } else {
                method.submit_label()
            },
            submitting,
            card: (method == PaymentMethod::Card).then(|| CardPreview {
                number: input.number.clone(),
                expiry: input.expiry.clone(),
                hint: CardNumberHint::for_input(&input.number),
            }),
        }
    });

    StoreView {
        header: HeaderView {
            cart_count: cart.item_count(),
            favorites_count: favorites.len(),
        },
        auth: store
            .auth()
            .current_user()
            .map_or(AuthView::Guest, |user| AuthView::SignedIn {
                name: user.name.clone(),
            }),
        products,
        favorites: favorite_items,
        cart: CartView {
            lines,
            item_count: cart.item_count(),
            total,
            is_empty: cart.is_empty(),
        },
        checkout,
        open_panels: store.panels().open_panels().to_vec(),
        notice: store.notice().cloned(),
    }
}

fn product_card(product: &Product, is_favorite: bool) -> ProductCard {
    ProductCard {
        id: product.id,
        name: product.name.clone(),
        emoji: product.emoji.clone(),
        category: product.category.label(),
        price: product.price.to_string(),
        old_price: product.old_price.map(|p| p.to_string()),
        badge: product.badge.clone(),
        is_favorite,
    }
}
