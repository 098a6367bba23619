//! Admin order handlers and the order response shape shared with checkout.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::OrderStatus;
use shopfront_db::{OrderItemRow, OrderRow};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct OrderView {
    pub id: i64,
    pub public_id: Uuid,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub date: DateTime<Utc>,
    pub status: String,
    pub total: Decimal,
    pub shipping_address: String,
    pub payment_method: String,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderItemView {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub image: Option<String>,
}

/// List rows carry no items; `items` is only populated on single-order
/// responses.
#[derive(Debug, Serialize)]
pub(super) struct OrderSummaryView {
    pub id: i64,
    pub public_id: Uuid,
    pub customer_name: String,
    pub date: DateTime<Utc>,
    pub status: String,
    pub total: Decimal,
}

impl OrderView {
    pub(super) fn from_rows(order: OrderRow, items: Vec<OrderItemRow>) -> Self {
        Self {
            id: order.id,
            public_id: order.public_id,
            customer_id: order.customer_id,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            date: order.order_date,
            status: order.status,
            total: order.total,
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            items: items
                .into_iter()
                .map(|item| OrderItemView {
                    product_id: item.product_id,
                    product_name: item.product_name,
                    quantity: item.quantity,
                    price: item.price,
                    image: item.image,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct OrderListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusPayload {
    pub status: String,
}

fn parse_status(req_id: &str, value: &str) -> Result<OrderStatus, ApiError> {
    OrderStatus::from_str(value).map_err(|_| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("unknown order status '{value}'"),
        )
    })
}

/// GET /api/v1/admin/orders — newest first, optional status filter.
pub(super) async fn list_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<ApiResponse<Vec<OrderSummaryView>>>, ApiError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(parse_status(&req_id.0, raw)?.to_string()),
        None => None,
    };

    let rows = shopfront_db::list_orders(
        &state.pool,
        status.as_deref(),
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| OrderSummaryView {
            id: row.id,
            public_id: row.public_id,
            customer_name: row.customer_name,
            date: row.order_date,
            status: row.status,
            total: row.total,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/admin/orders/:id
pub(super) async fn get_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<OrderView>>, ApiError> {
    let (order, items) = shopfront_db::get_order(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "order not found"))?;

    Ok(Json(ApiResponse {
        data: OrderView::from_rows(order, items),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/admin/orders/:id/status
pub(super) async fn update_order_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<StatusPayload>,
) -> Result<Json<ApiResponse<OrderSummaryView>>, ApiError> {
    let status = parse_status(&req_id.0, &body.status)?;

    let row = shopfront_db::update_order_status(&state.pool, id, &status.to_string())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "order not found"))?;

    Ok(Json(ApiResponse {
        data: OrderSummaryView {
            id: row.id,
            public_id: row.public_id,
            customer_name: row.customer_name,
            date: row.order_date,
            status: row.status,
            total: row.total,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/orders/:id
pub(super) async fn delete_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = shopfront_db::delete_order(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "order not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
