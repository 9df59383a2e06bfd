//! Favorites set.
//!
//! Membership only; entries are product ids in the order they were favorited.

use paw_paradise_core::{Catalog, Product, ProductId};

/// Result of [`FavoritesSet::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: Vec<ProductId>,
}

impl FavoritesSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Flip membership of `id`.
    ///
    /// Returns `None` when adding a product the catalog does not have.
    /// Removing always works, so stale ids can be cleaned up.
    pub fn toggle(&mut self, catalog: &Catalog, id: ProductId) -> Option<Toggled> {
        if self.remove(id) {
            return Some(Toggled::Removed);
        }
        catalog.find(id)?;
        self.ids.push(id);
        Some(Toggled::Added)
    }

    /// Returns whether `id` was a favorite.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|fav| *fav != id);
        self.ids.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Favorited products still present in the catalog.
    #[must_use]
    pub fn products<'c>(&self, catalog: &'c Catalog) -> Vec<&'c Product> {
        self.ids.iter().filter_map(|id| catalog.find(*id)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[
                {"id": 1, "name": "Cloud Bed", "category": "beds", "price": 40, "emoji": "🛏️"},
                {"id": 2, "name": "Paw Balm", "category": "grooming", "price": 9.5, "emoji": "🧴"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let catalog = catalog();
        let mut favorites = FavoritesSet::new();
        assert_eq!(favorites.toggle(&catalog, ProductId::new(1)), Some(Toggled::Added));
        assert!(favorites.contains(ProductId::new(1)));
        assert_eq!(
            favorites.toggle(&catalog, ProductId::new(1)),
            Some(Toggled::Removed)
        );
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_unknown_product_cannot_be_favorited() {
        let catalog = catalog();
        let mut favorites = FavoritesSet::new();
        assert_eq!(favorites.toggle(&catalog, ProductId::new(7)), None);
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_products_follow_favorite_order() {
        let catalog = catalog();
        let mut favorites = FavoritesSet::new();
        favorites.toggle(&catalog, ProductId::new(2));
        favorites.toggle(&catalog, ProductId::new(1));
        let names: Vec<&str> = favorites
            .products(&catalog)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Paw Balm", "Cloud Bed"]);
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn test_remove_reports_membership() {
        let catalog = catalog();
        let mut favorites = FavoritesSet::new();
        favorites.toggle(&catalog, ProductId::new(2));
        assert!(favorites.remove(ProductId::new(2)));
        assert!(!favorites.remove(ProductId::new(2)));
    }
}
