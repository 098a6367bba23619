//! Per-session storefront state: cart, wishlist, and compare list.
//!
//! Every mutation goes through [`SessionStore::with_session`], which also
//! snapshots the cart to disk when a state directory is configured. Handlers
//! that add a product fetch it from the catalog first, so the session holds a
//! snapshot of the product as it was at add time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{CartItem, CompareOutcome, Product};
use uuid::Uuid;

use crate::middleware::RequestId;
use crate::sessions::SessionStore;

use super::{map_db_error, unknown_session, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub(super) struct CartView {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub item_count: u64,
    pub drawer_open: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct WishlistView {
    pub items: Vec<Product>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct CompareView {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub(super) struct CompareToggleView {
    pub outcome: CompareOutcome,
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub(super) struct WishlistToggleView {
    /// Whether the product is on the wishlist after the toggle.
    pub in_wishlist: bool,
    pub items: Vec<Product>,
}

fn cart_view(data: &crate::sessions::SessionData) -> CartView {
    CartView {
        items: data.cart.items().to_vec(),
        total: data.cart.total(),
        item_count: data.cart.item_count(),
        drawer_open: data.cart.drawer_open(),
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct ProductRef {
    pub product_id: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct QuantityDelta {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct DrawerFlag {
    pub open: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(super) async fn load_product(
    state: &AppState,
    req_id: &str,
    product_id: i64,
) -> Result<Product, ApiError> {
    let row = shopfront_db::get_product(&state.pool, product_id)
        .await
        .map_err(|e| map_db_error(req_id.to_owned(), &e))?
        .ok_or_else(|| ApiError::new(req_id, "not_found", "product not found"))?;
    Ok(Product::from(row))
}

async fn in_session<R>(
    sessions: &SessionStore,
    req_id: &str,
    session_id: Uuid,
    f: impl FnOnce(&mut crate::sessions::SessionData) -> R,
) -> Result<R, ApiError> {
    sessions
        .with_session(session_id, f)
        .await
        .ok_or_else(|| unknown_session(req_id))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions
pub(super) async fn create_session(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<ApiResponse<SessionCreated>>) {
    let session_id = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            data: SessionCreated { session_id },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions/:session_id/cart
pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| cart_view(s)).await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/sessions/:session_id/cart/items
///
/// Adding an already-carted product bumps its quantity; either way the
/// drawer opens.
pub(super) async fn add_to_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<ProductRef>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let product = load_product(&state, &req_id.0, body.product_id).await?;
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| {
        s.cart.add(product);
        cart_view(s)
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/sessions/:session_id/cart/items/:product_id
pub(super) async fn update_quantity(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((session_id, product_id)): Path<(Uuid, i64)>,
    Json(body): Json<QuantityDelta>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| {
        s.cart.update_quantity(product_id, body.delta);
        cart_view(s)
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/sessions/:session_id/cart/items/:product_id
pub(super) async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((session_id, product_id)): Path<(Uuid, i64)>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| {
        s.cart.remove(product_id);
        cart_view(s)
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/sessions/:session_id/cart
pub(super) async fn clear_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| {
        s.cart.clear();
        cart_view(s)
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/sessions/:session_id/cart/drawer
pub(super) async fn set_drawer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<DrawerFlag>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| {
        s.cart.set_drawer_open(body.open);
        cart_view(s)
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

// ---------------------------------------------------------------------------
// Wishlist
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions/:session_id/wishlist
pub(super) async fn list_wishlist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<WishlistView>>, ApiError> {
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| WishlistView {
        items: s.wishlist.items().to_vec(),
        count: s.wishlist.count(),
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/sessions/:session_id/wishlist/toggle
pub(super) async fn toggle_wishlist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<ProductRef>,
) -> Result<Json<ApiResponse<WishlistToggleView>>, ApiError> {
    let product = load_product(&state, &req_id.0, body.product_id).await?;
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| {
        let in_wishlist = s.wishlist.toggle(product);
        WishlistToggleView {
            in_wishlist,
            items: s.wishlist.items().to_vec(),
        }
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

// ---------------------------------------------------------------------------
// Compare list
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions/:session_id/compare
pub(super) async fn list_compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CompareView>>, ApiError> {
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| CompareView {
        items: s.compare.items().to_vec(),
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/sessions/:session_id/compare/toggle
///
/// A fifth product is rejected outright; nothing already compared gets
/// evicted.
pub(super) async fn toggle_compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<ProductRef>,
) -> Result<Json<ApiResponse<CompareToggleView>>, ApiError> {
    let product = load_product(&state, &req_id.0, body.product_id).await?;
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| {
        let outcome = s.compare.toggle(product);
        CompareToggleView {
            outcome,
            items: s.compare.items().to_vec(),
        }
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/sessions/:session_id/compare/items/:product_id
pub(super) async fn remove_from_compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((session_id, product_id)): Path<(Uuid, i64)>,
) -> Result<Json<ApiResponse<CompareView>>, ApiError> {
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| {
        s.compare.remove(product_id);
        CompareView {
            items: s.compare.items().to_vec(),
        }
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/sessions/:session_id/compare
pub(super) async fn clear_compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CompareView>>, ApiError> {
    let view = in_session(&state.sessions, &req_id.0, session_id, |s| {
        s.compare.clear();
        CompareView {
            items: s.compare.items().to_vec(),
        }
    })
    .await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}
