//! Checkout handlers: the session cart path and the single-product express
//! path. Both package a cash-on-delivery order, persist it transactionally,
//! and only then notify and (for the cart path) clear the session cart. A
//! failed persist leaves the cart exactly as it was.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use shopfront_core::{
    order_from_cart, CheckoutForm, Order, OrderNotifier, VariantSelection,
};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::orders::OrderView;
use super::{unknown_session, ApiError, ApiResponse, AppState, ResponseMeta};

/// Notifier used in production: logs the order instead of sending anything.
/// Stands in for the confirmation-email hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl OrderNotifier for LogNotifier {
    fn order_placed(&self, order: &Order) {
        tracing::info!(
            public_id = %order.public_id,
            customer = %order.customer_name,
            total = %order.total,
            items = order.items.len(),
            "order placed"
        );
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
}

impl CheckoutRequest {
    fn split(self) -> (CheckoutForm, Option<String>) {
        (
            CheckoutForm {
                name: self.name,
                phone: self.phone,
                address: self.address,
                email: self.email,
            },
            self.customer_id,
        )
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ExpressCheckoutRequest {
    pub product_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(flatten)]
    pub checkout: CheckoutRequest,
}

fn map_checkout_error(req_id: &str, e: &shopfront_core::CheckoutError) -> ApiError {
    ApiError::new(req_id, "validation_error", e.to_string())
}

/// Resolves a named variant option against the product's own list. A name
/// the product does not offer is a validation error, not a silent no-op.
fn resolve_option(
    req_id: &str,
    kind: &str,
    options: &[shopfront_core::VariantOption],
    name: Option<&str>,
) -> Result<Option<shopfront_core::VariantOption>, ApiError> {
    let Some(name) = name else { return Ok(None) };
    options
        .iter()
        .find(|o| o.name == name)
        .cloned()
        .map(Some)
        .ok_or_else(|| {
            ApiError::new(
                req_id,
                "validation_error",
                format!("product has no {kind} option '{name}'"),
            )
        })
}

async fn persist_order(
    state: &AppState,
    req_id: &str,
    order: &Order,
) -> Result<shopfront_db::OrderRow, ApiError> {
    let row = shopfront_db::create_order(&state.pool, order)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "order persist failed");
            ApiError::new(req_id, "internal_error", "order could not be submitted")
        })?;
    state.notifier.order_placed(order);
    Ok(row)
}

fn order_view(row: shopfront_db::OrderRow, order: Order) -> OrderView {
    let items = order
        .items
        .into_iter()
        .map(|item| shopfront_db::OrderItemRow {
            id: 0,
            order_id: row.id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: i32::try_from(item.quantity).unwrap_or(i32::MAX),
            price: item.price,
            image: item.image,
        })
        .collect();
    OrderView::from_rows(row, items)
}

/// POST /api/v1/sessions/:session_id/checkout
pub(super) async fn session_checkout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderView>>), ApiError> {
    let (form, customer_id) = body.split();

    // Snapshot the order from the cart; nothing is cleared yet.
    let order = state
        .sessions
        .with_session(session_id, |s| order_from_cart(&s.cart, &form, customer_id))
        .await
        .ok_or_else(|| unknown_session(&req_id.0))?
        .map_err(|e| map_checkout_error(&req_id.0, &e))?;

    let row = persist_order(&state, &req_id.0, &order).await?;

    // The cart is only cleared once the order is safely stored.
    let cleared = state
        .sessions
        .with_session(session_id, |s| s.cart.clear())
        .await;
    if cleared.is_none() {
        tracing::warn!(session_id = %session_id, "session vanished before cart clear");
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: order_view(row, order),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// POST /api/v1/checkout/express — one product, no session required.
pub(super) async fn express_checkout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ExpressCheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderView>>), ApiError> {
    let product = super::cart::load_product(&state, &req_id.0, body.product_id).await?;
    let selection = VariantSelection {
        color: resolve_option(&req_id.0, "color", &product.colors, body.color.as_deref())?,
        size: resolve_option(&req_id.0, "size", &product.sizes, body.size.as_deref())?,
    };
    let quantity = body.quantity;
    let (form, customer_id) = body.checkout.split();

    let order = shopfront_core::express_order(&product, &selection, quantity, &form, customer_id)
        .map_err(|e| map_checkout_error(&req_id.0, &e))?;

    let row = persist_order(&state, &req_id.0, &order).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: order_view(row, order),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
