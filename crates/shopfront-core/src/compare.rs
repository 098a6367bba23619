//! The compare list: a bounded ad hoc selection of products for the
//! side-by-side comparison view.

use serde::Serialize;

use crate::product::Product;

/// Hard cap on the comparison view; the UI warns when it is hit.
pub const MAX_COMPARE: usize = 4;

/// What a toggle did, so the caller can tell "removed" from "refused".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOutcome {
    Added,
    Removed,
    /// The list was already at [`MAX_COMPARE`]; nothing changed. The existing
    /// selection is kept — the new product is refused, not swapped in.
    Rejected,
}

#[derive(Debug, Default)]
pub struct CompareList {
    items: Vec<Product>,
}

impl CompareList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `product` if selected; otherwise appends it unless the list is
    /// full, in which case the addition is rejected with no state change.
    pub fn toggle(&mut self, product: Product) -> CompareOutcome {
        if self.contains(product.id) {
            self.items.retain(|p| p.id != product.id);
            return CompareOutcome::Removed;
        }
        if self.items.len() >= MAX_COMPARE {
            return CompareOutcome::Rejected;
        }
        self.items.push(product);
        CompareOutcome::Added
    }

    #[must_use]
    pub fn contains(&self, product_id: i64) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Explicit removal, used from within the comparison view.
    pub fn remove(&mut self, product_id: i64) {
        self.items.retain(|p| p.id != product_id);
    }

    /// Empties the selection, dismissing the comparison bar.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
