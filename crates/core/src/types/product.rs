//! Products and the catalog they live in.
//!
//! The catalog is loaded once per session and never mutated afterwards. Cart
//! lines and favorites refer to products by [`ProductId`] only.

use core::fmt;
use core::str::FromStr;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Toys,
    Beds,
    Accessories,
    Grooming,
}

impl Category {
    /// Every category, in navigation order.
    pub const ALL: [Self; 5] = [
        Self::Food,
        Self::Toys,
        Self::Beds,
        Self::Accessories,
        Self::Grooming,
    ];

    /// Wire name, also used for search matching.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Toys => "toys",
            Self::Beds => "beds",
            Self::Accessories => "accessories",
            Self::Grooming => "grooming",
        }
    }

    /// Shopper-facing name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Food => "Dry Food",
            Self::Toys => "Toys",
            Self::Beds => "Beds & Houses",
            Self::Accessories => "Accessories",
            Self::Grooming => "Grooming",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category navigation target: everything, or a single category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

/// Returned when a category filter string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .map(Self::Only)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub emoji: String,
}

impl Product {
    /// Case-insensitive substring match over name and category.
    ///
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.category.as_str().contains(needle)
    }
}

/// Problems found while loading a catalog document.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The document is not a JSON array of products.
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    /// A price is below zero.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// The struck-through price is not above the current price.
    #[error("product {0} has an old price that is not above its price")]
    OldPriceNotHigher(ProductId),
}

/// The immutable, ordered set of products for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, enforcing unique ids and sane prices.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found, in document order.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id));
            }
            if product
                .old_price
                .is_some_and(|old| old <= product.price)
            {
                return Err(CatalogError::OldPriceNotHigher(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from its JSON document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or the validation
    /// error from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in the given category, or every product for `All`.
    #[must_use]
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&Product> {
        match filter {
            CategoryFilter::All => self.products.iter().collect(),
            CategoryFilter::Only(category) => self
                .products
                .iter()
                .filter(|p| p.category == category)
                .collect(),
        }
    }

    /// Case-insensitive substring search over name and category.
    ///
    /// An empty term returns the full catalog.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.products.iter().filter(|p| p.matches(&needle)).collect()
    }
}
