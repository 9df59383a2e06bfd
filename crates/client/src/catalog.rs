//! Catalog store.
//!
//! Loaded once at startup. A failed load is logged and leaves the store empty;
//! the storefront keeps working with nothing to show.

use paw_paradise_core::{Catalog, CategoryFilter, Product, ProductId};
use tracing::{error, info};

use crate::api::StorefrontApi;

/// What the product grid is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Category(CategoryFilter),
    Search(String),
}

impl Default for Listing {
    fn default() -> Self {
        Self::Category(CategoryFilter::All)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    catalog: Catalog,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the catalog. Returns the number of products loaded.
    ///
    /// Network and validation failures are logged, not returned.
    pub async fn load<A: StorefrontApi>(&mut self, api: &A) -> usize {
        let products = match api.catalog().await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "Failed to load catalog");
                return 0;
            }
        };

        match Catalog::new(products) {
            Ok(catalog) => {
                info!(products = catalog.len(), "Catalog loaded");
                self.catalog = catalog;
                self.catalog.len()
            }
            Err(e) => {
                error!(error = %e, "Catalog rejected");
                0
            }
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.catalog.find(id)
    }

    /// Products for the given listing, in catalog order.
    #[must_use]
    pub fn list(&self, listing: &Listing) -> Vec<&Product> {
        match listing {
            Listing::Category(filter) => self.catalog.filter(*filter),
            Listing::Search(term) => self.catalog.search(term),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::MemoryApi;
    use paw_paradise_core::Category;

    fn products() -> Vec<Product> {
        serde_json::from_str(
            r#"[
                {"id": 1, "name": "Rope Tug", "category": "toys", "price": 7.5, "emoji": "🪢"},
                {"id": 2, "name": "Oat Shampoo", "category": "grooming", "price": 11, "emoji": "🧴"}
            ]"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_and_list() {
        let api = MemoryApi::new().with_catalog(products());
        let mut store = CatalogStore::new();
        assert_eq!(store.load(&api).await, 2);

        let toys = store.list(&Listing::Category(CategoryFilter::Only(Category::Toys)));
        assert_eq!(toys.len(), 1);
        assert_eq!(store.list(&Listing::Search("SHAMP".to_owned())).len(), 1);
        assert_eq!(store.list(&Listing::default()).len(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_store_empty() {
        let api = MemoryApi::new().with_catalog(products());
        api.set_offline(true);
        let mut store = CatalogStore::new();
        assert_eq!(store.load(&api).await, 0);
        assert!(store.catalog().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_catalog_is_rejected() {
        let mut duplicated = products();
        duplicated.push(duplicated[0].clone());
        let api = MemoryApi::new().with_catalog(duplicated);
        let mut store = CatalogStore::new();
        assert_eq!(store.load(&api).await, 0);
        assert!(store.find(ProductId::new(1)).is_none());
    }
}
