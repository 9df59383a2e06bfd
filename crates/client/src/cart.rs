//! Cart ledger.
//!
//! Lines are keyed by product id and kept in the order they were first added.
//! Names and prices are resolved against the catalog when needed, so a line
//! whose product has vanished simply drops out of the total.

use paw_paradise_core::{Catalog, Price, Product, ProductId};

/// One product in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    /// Always at least 1; a line that reaches 0 is removed.
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line against `product`.
    #[must_use]
    pub fn line_total(&self, product: &Product) -> Price {
        product.price * self.quantity
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLedger {
    lines: Vec<CartLine>,
}

impl CartLedger {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `id`, creating the line if needed.
    ///
    /// Returns the new quantity, or `None` if the product is not in the
    /// catalog (nothing changes).
    pub fn add(&mut self, catalog: &Catalog, id: ProductId) -> Option<u32> {
        catalog.find(id)?;
        if let Some(line) = self.line_mut(id) {
            line.quantity = line.quantity.saturating_add(1);
            return Some(line.quantity);
        }
        self.lines.push(CartLine {
            product_id: id,
            quantity: 1,
        });
        Some(1)
    }

    /// Adjust the quantity of `id` by `delta`.
    ///
    /// The line is removed when the quantity drops to zero or below. Returns
    /// the remaining quantity, `Some(0)` when the line was removed, or `None`
    /// when `id` is not in the cart.
    pub fn change_quantity(&mut self, id: ProductId, delta: i32) -> Option<u32> {
        let line = self.line_mut(id)?;
        let next = i64::from(line.quantity) + i64::from(delta);
        match u32::try_from(next) {
            Ok(quantity) if quantity > 0 => {
                line.quantity = quantity;
                Some(quantity)
            }
            _ => {
                self.remove(id);
                Some(0)
            }
        }
    }

    /// Delete the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Lines paired with their products, skipping any the catalog no longer has.
    pub fn resolved<'c>(
        &self,
        catalog: &'c Catalog,
    ) -> impl Iterator<Item = (&'c Product, CartLine)> {
        self.lines
            .iter()
            .filter_map(move |line| catalog.find(line.product_id).map(|p| (p, *line)))
    }

    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id == id)
            .map_or(0, |line| line.quantity)
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals for products still in the catalog.
    #[must_use]
    pub fn total(&self, catalog: &Catalog) -> Price {
        self.resolved(catalog)
            .map(|(product, line)| line.line_total(product))
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product_id == id)
    }
}
