//! Checkout packaging: contact-form validation and order construction.
//!
//! The only business rules here are required-field validation and the
//! cart-to-order snapshot; persistence is the caller's concern. There is no
//! idempotency key, so submitting the same cart twice creates two orders.

use thiserror::Error;
use uuid::Uuid;

use chrono::Utc;
use serde::Deserialize;

use crate::cart::CartStore;
use crate::order::{Order, OrderItem, OrderStatus, PAYMENT_CASH_ON_DELIVERY};
use crate::pricing::{displayed_price, VariantSelection};
use crate::product::Product;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("'{0}' is required")]
    MissingField(&'static str),
    #[error("cannot check out an empty cart")]
    EmptyCart,
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// The checkout contact form. Name, phone, and address are required;
/// email is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl CheckoutForm {
    /// Checks required fields, reporting the first missing one.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingField`] when name, phone, or address
    /// is empty after trimming.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.name.trim().is_empty() {
            return Err(CheckoutError::MissingField("name"));
        }
        if self.phone.trim().is_empty() {
            return Err(CheckoutError::MissingField("phone"));
        }
        if self.address.trim().is_empty() {
            return Err(CheckoutError::MissingField("address"));
        }
        Ok(())
    }
}

/// Notified after an order has been successfully persisted. Models the
/// order-notification hook (e.g. a confirmation email); implementations must
/// not fail the checkout.
pub trait OrderNotifier: Send + Sync {
    fn order_placed(&self, order: &Order);
}

/// A notifier that does nothing; the default and the test double.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl OrderNotifier for NoopNotifier {
    fn order_placed(&self, _order: &Order) {}
}

/// Builds a `Pending` cash-on-delivery order from the cart contents.
///
/// Line items snapshot the product id, name, unit price, and image at this
/// moment; the order total is the cart total. The cart itself is not touched
/// here — callers clear it only after persistence succeeds.
///
/// # Errors
///
/// Returns [`CheckoutError::MissingField`] on failed form validation, or
/// [`CheckoutError::EmptyCart`] when there is nothing to order.
pub fn order_from_cart(
    cart: &CartStore,
    form: &CheckoutForm,
    customer_id: Option<String>,
) -> Result<Order, CheckoutError> {
    form.validate()?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let items = cart
        .items()
        .iter()
        .map(|line| OrderItem {
            product_id: line.product.id,
            product_name: line.product.title.clone(),
            quantity: line.quantity,
            price: line.product.price,
            image: Some(line.product.image.clone()).filter(|i| !i.is_empty()),
        })
        .collect();

    Ok(build_order(form, customer_id, cart.total(), items))
}

/// Express checkout: a single product with its variant selection, bypassing
/// the cart. The unit price is the variant-adjusted displayed price.
///
/// # Errors
///
/// Returns [`CheckoutError::MissingField`] on failed form validation, or
/// [`CheckoutError::InvalidQuantity`] when `quantity` is zero.
pub fn express_order(
    product: &Product,
    selection: &VariantSelection,
    quantity: u32,
    form: &CheckoutForm,
    customer_id: Option<String>,
) -> Result<Order, CheckoutError> {
    form.validate()?;
    if quantity == 0 {
        return Err(CheckoutError::InvalidQuantity);
    }

    let unit_price = displayed_price(product, selection);
    let item = OrderItem {
        product_id: product.id,
        product_name: product.title.clone(),
        quantity,
        price: unit_price,
        image: Some(product.image.clone()).filter(|i| !i.is_empty()),
    };
    let total = item.line_total();

    Ok(build_order(form, customer_id, total, vec![item]))
}

fn build_order(
    form: &CheckoutForm,
    customer_id: Option<String>,
    total: rust_decimal::Decimal,
    items: Vec<OrderItem>,
) -> Order {
    Order {
        public_id: Uuid::new_v4(),
        customer_id,
        customer_name: form.name.trim().to_string(),
        customer_email: form
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(ToOwned::to_owned),
        customer_phone: form.phone.trim().to_string(),
        date: Utc::now(),
        status: OrderStatus::Pending,
        total,
        shipping_address: form.address.trim().to_string(),
        payment_method: PAYMENT_CASH_ON_DELIVERY.to_string(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::VariantOption;
    use crate::product::Rating;
    use rust_decimal::Decimal;

    fn make_product(id: i64, price: i64) -> Product {
        Product {
            id,
            title: format!("Product {id}"),
            price: Decimal::from(price),
            original_price: None,
            description: String::new(),
            category: "Tools".to_string(),
            image: format!("https://img.example.com/{id}.jpg"),
            images: vec![],
            rating: Rating::default(),
            ft_url: None,
            fi_url: None,
            stock: None,
            colors: vec![],
            sizes: vec![],
        }
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "Ada Lovelace".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Analytical Way".to_string(),
            email: None,
        }
    }

    #[test]
    fn validation_reports_each_missing_field() {
        let mut f = form();
        f.name = "  ".to_string();
        assert_eq!(f.validate(), Err(CheckoutError::MissingField("name")));

        let mut f = form();
        f.phone = String::new();
        assert_eq!(f.validate(), Err(CheckoutError::MissingField("phone")));

        let mut f = form();
        f.address = "\t".to_string();
        assert_eq!(f.validate(), Err(CheckoutError::MissingField("address")));

        assert!(form().validate().is_ok(), "email is optional");
    }

    #[test]
    fn order_snapshots_cart_lines() {
        let mut cart = CartStore::new();
        cart.add(make_product(1, 100));
        cart.add(make_product(1, 100));
        cart.add(make_product(2, 50));

        let order = order_from_cart(&cart, &form(), None).expect("order");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_method, PAYMENT_CASH_ON_DELIVERY);
        assert_eq!(order.total, Decimal::from(250));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].product_name, "Product 1");
        assert!(order.customer_id.is_none(), "guest checkout");
        assert!(
            !cart.is_empty(),
            "building the order must not clear the cart"
        );
    }

    #[test]
    fn empty_cart_cannot_be_checked_out() {
        let cart = CartStore::new();
        assert_eq!(
            order_from_cart(&cart, &form(), None),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn invalid_form_blocks_submission_before_anything_else() {
        let cart = CartStore::new();
        let mut bad = form();
        bad.phone = String::new();
        // An empty cart AND a bad form: validation is reported first.
        assert_eq!(
            order_from_cart(&cart, &bad, None),
            Err(CheckoutError::MissingField("phone"))
        );
    }

    #[test]
    fn express_order_uses_variant_adjusted_price() {
        let product = make_product(1, 100);
        let selection = VariantSelection {
            color: Some(VariantOption {
                name: "Red".to_string(),
                price_modifier: Decimal::from(150),
            }),
            size: Some(VariantOption {
                name: "Large".to_string(),
                price_modifier: Decimal::from(50),
            }),
        };
        let order = express_order(&product, &selection, 2, &form(), None).expect("order");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, Decimal::from(300));
        assert_eq!(order.total, Decimal::from(600));
    }

    #[test]
    fn express_order_rejects_zero_quantity() {
        let product = make_product(1, 100);
        assert_eq!(
            express_order(&product, &VariantSelection::default(), 0, &form(), None),
            Err(CheckoutError::InvalidQuantity)
        );
    }

    #[test]
    fn blank_email_is_normalized_to_none() {
        let mut cart = CartStore::new();
        cart.add(make_product(1, 10));
        let mut f = form();
        f.email = Some("   ".to_string());
        let order = order_from_cart(&cart, &f, None).expect("order");
        assert!(order.customer_email.is_none());
    }

    #[test]
    fn two_submissions_build_two_distinct_orders() {
        // Documents the missing idempotency key: nothing ties repeated
        // submissions of the same cart together.
        let mut cart = CartStore::new();
        cart.add(make_product(1, 10));
        let first = order_from_cart(&cart, &form(), None).expect("first");
        let second = order_from_cart(&cart, &form(), None).expect("second");
        assert_ne!(first.public_id, second.public_id);
    }

    #[test]
    fn noop_notifier_accepts_orders() {
        let mut cart = CartStore::new();
        cart.add(make_product(1, 10));
        let order = order_from_cart(&cart, &form(), None).expect("order");
        NoopNotifier.order_placed(&order);
    }
}
