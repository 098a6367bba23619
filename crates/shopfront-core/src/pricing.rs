//! Variant price calculation.
//!
//! Color and size selections each carry a flat additive modifier applied on
//! top of the base price at display time. Variant selection is presentational
//! only; it never becomes part of cart-line identity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;

/// A selectable variant (one color or one size) with its price modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantOption {
    pub name: String,
    /// Flat amount added to the base price when this option is selected.
    /// Zero for options that do not change the price.
    #[serde(default)]
    pub price_modifier: Decimal,
}

/// The shopper's current color/size selection for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSelection {
    #[serde(default)]
    pub color: Option<VariantOption>,
    #[serde(default)]
    pub size: Option<VariantOption>,
}

impl VariantSelection {
    /// Sum of the modifiers of the selected options.
    #[must_use]
    pub fn modifier_total(&self) -> Decimal {
        let color = self.color.as_ref().map_or(Decimal::ZERO, |o| o.price_modifier);
        let size = self.size.as_ref().map_or(Decimal::ZERO, |o| o.price_modifier);
        color + size
    }
}

/// Price actually charged for `product` under `selection`:
/// base price plus the selected color and size modifiers.
#[must_use]
pub fn displayed_price(product: &Product, selection: &VariantSelection) -> Decimal {
    product.price + selection.modifier_total()
}

/// Struck-through comparison price under `selection`, when the product has a
/// real discount. The modifiers are applied to the original price too, so the
/// discount carries through variant selection. `None` when not on sale.
#[must_use]
pub fn displayed_original_price(
    product: &Product,
    selection: &VariantSelection,
) -> Option<Decimal> {
    if !product.is_on_sale() {
        return None;
    }
    product
        .original_price
        .map(|orig| orig + selection.modifier_total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Rating;

    fn option(name: &str, modifier: i64) -> VariantOption {
        VariantOption {
            name: name.to_string(),
            price_modifier: Decimal::from(modifier),
        }
    }

    fn product(price: i64, original: Option<i64>) -> Product {
        Product {
            id: 1,
            title: "Angle Grinder".to_string(),
            price: Decimal::from(price),
            original_price: original.map(Decimal::from),
            description: String::new(),
            category: "Tools".to_string(),
            image: String::new(),
            images: vec![],
            rating: Rating::default(),
            ft_url: None,
            fi_url: None,
            stock: None,
            colors: vec![option("Red", 150), option("Black", 0)],
            sizes: vec![option("Large", 50)],
        }
    }

    #[test]
    fn base_price_when_nothing_selected() {
        let p = product(100, None);
        assert_eq!(
            displayed_price(&p, &VariantSelection::default()),
            Decimal::from(100)
        );
    }

    #[test]
    fn color_and_size_modifiers_are_additive() {
        let p = product(100, None);
        let selection = VariantSelection {
            color: Some(option("Red", 150)),
            size: Some(option("Large", 50)),
        };
        assert_eq!(displayed_price(&p, &selection), Decimal::from(300));
    }

    #[test]
    fn single_modifier_applies_alone() {
        let p = product(100, None);
        let selection = VariantSelection {
            color: None,
            size: Some(option("Large", 50)),
        };
        assert_eq!(displayed_price(&p, &selection), Decimal::from(150));
    }

    #[test]
    fn original_price_carries_modifiers_when_on_sale() {
        let p = product(100, Some(130));
        let selection = VariantSelection {
            color: Some(option("Red", 150)),
            size: Some(option("Large", 50)),
        };
        assert_eq!(
            displayed_original_price(&p, &selection),
            Some(Decimal::from(330))
        );
    }

    #[test]
    fn no_original_price_when_not_on_sale() {
        let selection = VariantSelection {
            color: Some(option("Red", 150)),
            size: None,
        };
        assert_eq!(displayed_original_price(&product(100, None), &selection), None);
        // Original at or below the current price is not a discount.
        assert_eq!(displayed_original_price(&product(100, Some(100)), &selection), None);
        assert_eq!(displayed_original_price(&product(100, Some(90)), &selection), None);
    }

    #[test]
    fn negative_modifiers_reduce_the_price() {
        let p = product(100, None);
        let selection = VariantSelection {
            color: Some(option("Clearance Gray", -20)),
            size: None,
        };
        assert_eq!(displayed_price(&p, &selection), Decimal::from(80));
    }
}
