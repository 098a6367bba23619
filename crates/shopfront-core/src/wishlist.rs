//! The wishlist store: a set of liked products, keyed by product id.
//!
//! Session-only state; nothing here is persisted across sessions.

use crate::product::Product;

#[derive(Debug, Default)]
pub struct WishlistStore {
    items: Vec<Product>,
}

impl WishlistStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set-toggle: adds `product` if absent, removes it if present.
    /// Returns `true` when the product is in the wishlist afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            self.items.retain(|p| p.id != product.id);
            false
        } else {
            self.items.push(product);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: i64) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }
}
