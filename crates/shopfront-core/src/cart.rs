//! The cart store: the authoritative list of items a visitor intends to buy.
//!
//! Mutations are synchronous and last-write-wins; the caller persists a
//! versioned snapshot through a [`CartStorage`] backend after every mutation
//! and restores it once at session start.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;

/// Version tag written into every persisted snapshot. Bump on any change to
/// the snapshot shape; readers reset to an empty cart on mismatch.
pub const CART_SCHEMA_VERSION: u32 = 1;

/// One cart line: a product snapshot plus a quantity of at least 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The persisted cart snapshot format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCart {
    pub version: u32,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Error)]
pub enum CartStorageError {
    #[error("cart storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cart snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where cart snapshots live. Backends hold opaque JSON payloads; the store
/// owns the format and decides what to do with unreadable data.
pub trait CartStorage {
    /// Returns the stored payload, or `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError::Io`] if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, CartStorageError>;

    /// Replaces the stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError::Io`] if the backend cannot be written.
    fn save(&mut self, payload: &str) -> Result<(), CartStorageError>;
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
    payload: Option<String>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load a payload, e.g. to simulate a previous session's snapshot.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self) -> Result<Option<String>, CartStorageError> {
        Ok(self.payload.clone())
    }

    fn save(&mut self, payload: &str) -> Result<(), CartStorageError> {
        self.payload = Some(payload.to_string());
        Ok(())
    }
}

/// File-backed storage: one JSON file per cart.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> Result<Option<String>, CartStorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CartStorageError::Io(e)),
        }
    }

    fn save(&mut self, payload: &str) -> Result<(), CartStorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// The cart itself: line items plus the drawer-visibility flag the UI reads.
#[derive(Debug, Default)]
pub struct CartStore {
    items: Vec<CartItem>,
    drawer_open: bool,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a cart from storage. A missing snapshot, a parse failure, or
    /// a schema-version mismatch all yield an empty cart; the two failure
    /// cases are logged rather than propagated, so stale or corrupt local
    /// state can never wedge a session at startup.
    pub fn load_or_default(storage: &dyn CartStorage) -> Self {
        let payload = match storage.load() {
            Ok(Some(payload)) => payload,
            Ok(None) => return Self::new(),
            Err(e) => {
                tracing::warn!(error = %e, "cart snapshot unreadable, starting empty");
                return Self::new();
            }
        };

        match serde_json::from_str::<SavedCart>(&payload) {
            Ok(saved) if saved.version == CART_SCHEMA_VERSION => Self {
                items: saved.items,
                drawer_open: false,
            },
            Ok(saved) => {
                tracing::warn!(
                    found = saved.version,
                    expected = CART_SCHEMA_VERSION,
                    "cart snapshot version mismatch, resetting cart"
                );
                Self::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "malformed cart snapshot, resetting cart");
                Self::new()
            }
        }
    }

    /// Serializes the current items as a versioned snapshot payload.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError::Serialize`] if serialization fails.
    pub fn snapshot(&self) -> Result<String, CartStorageError> {
        let saved = SavedCart {
            version: CART_SCHEMA_VERSION,
            items: self.items.clone(),
        };
        Ok(serde_json::to_string(&saved)?)
    }

    /// Writes the current items to storage as a versioned snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError`] if serialization or the backend write
    /// fails.
    pub fn save_to(&self, storage: &mut dyn CartStorage) -> Result<(), CartStorageError> {
        storage.save(&self.snapshot()?)
    }

    /// Adds one unit of `product` and opens the cart drawer.
    ///
    /// Lines are merged by product id alone: adding a product that is already
    /// present increments that line's quantity, even when the shopper picked
    /// a different color/size variant. Variant selection is display-time
    /// pricing only (see [`crate::pricing`]); collapsing variants into one
    /// line is a deliberate fidelity choice, not an oversight. No stock-limit
    /// check happens here.
    pub fn add(&mut self, product: Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity += 1;
        } else {
            self.items.push(CartItem {
                product,
                quantity: 1,
            });
        }
        self.drawer_open = true;
    }

    /// Removes the line for `product_id`. No-op when absent.
    pub fn remove(&mut self, product_id: i64) {
        self.items.retain(|i| i.product.id != product_id);
    }

    /// Adjusts a line's quantity by `delta`, flooring at 1. Reaching zero is
    /// impossible through this path; removal goes through [`Self::remove`].
    /// No-op when the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: i64, delta: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            let new_quantity = i64::from(item.quantity).saturating_add(delta).max(1);
            item.quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ price × quantity over all lines. Recomputed on demand, never cached.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Σ quantity over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Whether the UI should show the cart drawer. Flipped on by [`Self::add`].
    #[must_use]
    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn set_drawer_open(&mut self, open: bool) {
        self.drawer_open = open;
    }
}
