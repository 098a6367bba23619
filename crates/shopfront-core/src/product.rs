//! Catalog and content record types shared across the storefront.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::VariantOption;

/// Stock count shown for products that never had one recorded.
pub const DEFAULT_STOCK: i32 = 10;

/// Average rating and vote count for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: i64,
}

impl Default for Rating {
    fn default() -> Self {
        Self { rate: 0.0, count: 0 }
    }
}

/// A storefront product.
///
/// `category` is a free-text label, not a foreign key into [`Category`] —
/// the two are matched by string equality only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    /// Pre-discount price. Only meaningful for discount display when strictly
    /// greater than `price`; nothing enforces that at write time.
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    pub category: String,
    /// Primary image URL.
    #[serde(default)]
    pub image: String,
    /// Additional gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: Rating,
    /// Technical file URL (datasheet). Name kept from the upstream records.
    #[serde(default)]
    pub ft_url: Option<String>,
    /// Instruction file URL (manual). Name kept from the upstream records.
    #[serde(default)]
    pub fi_url: Option<String>,
    /// Units in stock; `None` means "unknown", displayed as [`DEFAULT_STOCK`].
    #[serde(default)]
    pub stock: Option<i32>,
    /// Selectable color variants, each with an additive price modifier.
    #[serde(default)]
    pub colors: Vec<VariantOption>,
    /// Selectable size variants, each with an additive price modifier.
    #[serde(default)]
    pub sizes: Vec<VariantOption>,
}

impl Product {
    /// Returns `true` when the product carries a real discount, i.e. an
    /// original price strictly greater than the current price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|orig| orig > self.price)
    }

    /// Stock count for display, substituting [`DEFAULT_STOCK`] when unknown.
    #[must_use]
    pub fn stock_or_default(&self) -> i32 {
        self.stock.unwrap_or(DEFAULT_STOCK)
    }

    /// Discount as a whole percentage of the original price, when on sale.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        use rust_decimal::prelude::ToPrimitive;

        let orig = self.original_price?;
        if orig <= self.price || orig.is_zero() {
            return None;
        }
        let pct = (orig - self.price) / orig * Decimal::from(100);
        pct.round().to_u32()
    }
}

/// A display category. Not referentially tied to [`Product::category`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_count: Option<i64>,
}

/// A homepage carousel slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerSlide {
    pub id: i64,
    pub image: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// A navigation menu entry, ordered by `position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub label: String,
    pub path: String,
    pub position: i32,
}

/// A stored customer contact record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
}
