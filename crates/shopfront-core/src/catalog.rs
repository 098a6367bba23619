//! The catalog filter/sort pipeline.
//!
//! A pure transformation from the full product list to the list to render,
//! applied in a fixed order: search filter, then category filter, then sort.
//! Deterministic and idempotent for identical inputs.

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Sentinel category meaning "no category filter".
pub const CATEGORY_ALL: &str = "All";

/// Sentinel category selecting only discounted products.
pub const CATEGORY_ON_SALE: &str = "On Sale";

/// Sort order for the product grid. `Featured` preserves input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Rating,
}

/// The UI filter state driving the pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive substring matched against title or category.
    /// Empty or absent means "no search filter".
    #[serde(default)]
    pub search: Option<String>,
    /// A literal category name, or one of the sentinels
    /// [`CATEGORY_ALL`] / [`CATEGORY_ON_SALE`]. Absent means "All".
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

/// Applies search, category, and sort to `products`, in that order.
///
/// Sentinel handling: `"On Sale"` keeps only products whose original price is
/// strictly greater than the current price; `"All"` applies no category
/// filter; any other value is matched against `Product::category` exactly
/// (case-sensitive). All sorts are stable, so equal keys keep input order.
#[must_use]
pub fn filter_and_sort(products: &[Product], query: &CatalogQuery) -> Vec<Product> {
    let mut result: Vec<Product> = products
        .iter()
        .filter(|p| matches_search(p, query.search.as_deref()))
        .filter(|p| matches_category(p, query.category.as_deref()))
        .cloned()
        .collect();

    match query.sort {
        SortKey::Featured => {}
        SortKey::PriceAsc => result.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => result.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => result.sort_by(|a, b| b.rating.rate.total_cmp(&a.rating.rate)),
    }

    result
}

fn matches_search(product: &Product, search: Option<&str>) -> bool {
    let Some(term) = search else { return true };
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    product.title.to_lowercase().contains(&term)
        || product.category.to_lowercase().contains(&term)
}

fn matches_category(product: &Product, category: Option<&str>) -> bool {
    match category {
        None => true,
        Some(CATEGORY_ALL) => true,
        Some(CATEGORY_ON_SALE) => product.is_on_sale(),
        Some(selected) => product.category == selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Rating;
    use rust_decimal::Decimal;

    fn make_product(id: i64, price: i64, category: &str) -> Product {
        Product {
            id,
            title: format!("Product {id}"),
            price: Decimal::from(price),
            original_price: None,
            description: String::new(),
            category: category.to_string(),
            image: String::new(),
            images: vec![],
            rating: Rating::default(),
            ft_url: None,
            fi_url: None,
            stock: None,
            colors: vec![],
            sizes: vec![],
        }
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let result = filter_and_sort(&[], &CatalogQuery::default());
        assert!(result.is_empty());
    }

    #[test]
    fn price_ascending_sorts_across_categories() {
        // Scenario: two products in different categories, category "All".
        let a = make_product(1, 100, "A");
        let mut b = make_product(2, 50, "B");
        b.original_price = Some(Decimal::from(80));
        let products = vec![a, b];

        let query = CatalogQuery {
            search: Some(String::new()),
            category: Some(CATEGORY_ALL.to_string()),
            sort: SortKey::PriceAsc,
        };
        assert_eq!(ids(&filter_and_sort(&products, &query)), vec![2, 1]);
    }

    #[test]
    fn on_sale_keeps_only_real_discounts() {
        let a = make_product(1, 100, "A");
        let mut b = make_product(2, 50, "B");
        b.original_price = Some(Decimal::from(80));
        let products = vec![a, b];

        let query = CatalogQuery {
            category: Some(CATEGORY_ON_SALE.to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&products, &query)), vec![2]);
    }

    #[test]
    fn on_sale_excludes_products_without_original_price() {
        let mut not_discounted = make_product(1, 100, "A");
        not_discounted.original_price = Some(Decimal::from(100));
        let no_original = make_product(2, 50, "A");
        let products = vec![not_discounted, no_original];

        let query = CatalogQuery {
            search: Some("product".to_string()),
            category: Some(CATEGORY_ON_SALE.to_string()),
            sort: SortKey::Featured,
        };
        assert!(
            filter_and_sort(&products, &query).is_empty(),
            "no original price, or original <= price, must never pass On Sale"
        );
    }

    #[test]
    fn category_match_is_exact_and_case_sensitive() {
        let products = vec![
            make_product(1, 10, "Tools"),
            make_product(2, 10, "tools"),
            make_product(3, 10, "Tools & More"),
        ];
        let query = CatalogQuery {
            category: Some("Tools".to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&products, &query)), vec![1]);
    }

    #[test]
    fn search_matches_title_or_category_case_insensitively() {
        let mut hammer = make_product(1, 10, "Hand Tools");
        hammer.title = "Claw Hammer".to_string();
        let mut saw = make_product(2, 10, "Power Tools");
        saw.title = "Circular Saw".to_string();
        let mut bench = make_product(3, 10, "Furniture");
        bench.title = "Work Bench".to_string();
        let products = vec![hammer, saw, bench];

        let query = CatalogQuery {
            search: Some("TOOLS".to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&products, &query)), vec![1, 2]);

        let query = CatalogQuery {
            search: Some("hammer".to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&products, &query)), vec![1]);
    }

    #[test]
    fn search_with_no_matches_is_empty_not_an_error() {
        let products = vec![make_product(1, 10, "Tools")];
        let query = CatalogQuery {
            search: Some("zzz-no-such-product".to_string()),
            ..CatalogQuery::default()
        };
        assert!(filter_and_sort(&products, &query).is_empty());
    }

    #[test]
    fn featured_preserves_input_order() {
        let products = vec![
            make_product(3, 30, "A"),
            make_product(1, 10, "A"),
            make_product(2, 20, "A"),
        ];
        let result = filter_and_sort(&products, &CatalogQuery::default());
        assert_eq!(ids(&result), vec![3, 1, 2]);
    }

    #[test]
    fn price_descending_reverses_ascending() {
        let products = vec![
            make_product(1, 10, "A"),
            make_product(2, 30, "A"),
            make_product(3, 20, "A"),
        ];
        let query = CatalogQuery {
            sort: SortKey::PriceDesc,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&products, &query)), vec![2, 3, 1]);
    }

    #[test]
    fn rating_sorts_descending_with_stable_ties() {
        let mut a = make_product(1, 10, "A");
        a.rating = Rating { rate: 4.5, count: 10 };
        let mut b = make_product(2, 10, "A");
        b.rating = Rating { rate: 3.0, count: 4 };
        let mut c = make_product(3, 10, "A");
        c.rating = Rating { rate: 4.5, count: 2 };
        let products = vec![a, b, c];

        let query = CatalogQuery {
            sort: SortKey::Rating,
            ..CatalogQuery::default()
        };
        // Equal rates keep input order: 1 before 3.
        assert_eq!(ids(&filter_and_sort(&products, &query)), vec![1, 3, 2]);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let mut a = make_product(1, 100, "A");
        a.rating = Rating { rate: 2.0, count: 1 };
        let mut b = make_product(2, 50, "B");
        b.original_price = Some(Decimal::from(80));
        b.rating = Rating { rate: 4.0, count: 9 };
        let products = vec![a, b, make_product(3, 75, "A")];

        let query = CatalogQuery {
            search: Some("product".to_string()),
            category: Some(CATEGORY_ALL.to_string()),
            sort: SortKey::PriceAsc,
        };
        let once = filter_and_sort(&products, &query);
        let twice = filter_and_sort(&once, &query);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn sort_key_deserializes_from_kebab_case() {
        assert_eq!(
            serde_json::from_str::<SortKey>("\"price-asc\"").expect("parse"),
            SortKey::PriceAsc
        );
        assert_eq!(
            serde_json::from_str::<SortKey>("\"featured\"").expect("parse"),
            SortKey::Featured
        );
        assert!(serde_json::from_str::<SortKey>("\"newest\"").is_err());
    }
}
