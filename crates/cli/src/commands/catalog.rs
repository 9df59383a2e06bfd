//! Catalog file checks.

use std::collections::BTreeMap;
use std::path::Path;

use paw_paradise_core::{Catalog, Category, Price};

/// Counts reported after a successful check.
#[derive(Debug, PartialEq, Eq)]
pub struct CatalogSummary {
    pub products: usize,
    pub per_category: BTreeMap<&'static str, usize>,
    pub on_sale: usize,
    pub cheapest: Option<Price>,
    pub dearest: Option<Price>,
}

impl CatalogSummary {
    #[must_use]
    pub fn of(catalog: &Catalog) -> Self {
        let products = catalog.products();
        let per_category = Category::ALL
            .iter()
            .map(|category| {
                let count = products.iter().filter(|p| p.category == *category).count();
                (category.as_str(), count)
            })
            .collect();

        Self {
            products: products.len(),
            per_category,
            on_sale: products.iter().filter(|p| p.old_price.is_some()).count(),
            cheapest: products.iter().map(|p| p.price).min(),
            dearest: products.iter().map(|p| p.price).max(),
        }
    }

    /// Categories with nothing to show in the storefront filter.
    #[must_use]
    pub fn empty_categories(&self) -> Vec<&'static str> {
        self.per_category
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Parse and validate a catalog file, then print a summary.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation (malformed
/// JSON, duplicate ids, negative prices, old price not above price).
pub async fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(path = %path.display(), "Checking catalog");

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let catalog = Catalog::from_json(&json)?;
    let summary = CatalogSummary::of(&catalog);

    for name in summary.empty_categories() {
        tracing::warn!(category = name, "Category has no products");
    }

    #[allow(clippy::print_stdout)]
    {
        println!("{}: {} products", path.display(), summary.products);
        for (category, count) in &summary.per_category {
            println!("  {category:<12} {count}");
        }
        println!("  on sale      {}", summary.on_sale);
        if let (Some(low), Some(high)) = (summary.cheapest, summary.dearest) {
            println!("  price range  {low} - {high}");
        }
    }

    Ok(())
}
