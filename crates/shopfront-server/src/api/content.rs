//! Handlers for storefront content: banner slides, menu items, and the
//! contact form.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use shopfront_core::{BannerSlide, Contact, MenuItem};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Banner slides
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct BannerSlidePayload {
    pub image: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// POST /api/v1/admin/banners
pub(super) async fn create_banner_slide(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<BannerSlidePayload>,
) -> Result<(StatusCode, Json<ApiResponse<BannerSlide>>), ApiError> {
    if body.image.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "image must not be blank",
        ));
    }

    let row = shopfront_db::create_banner_slide(
        &state.pool,
        &body.image,
        body.title.as_deref(),
        body.subtitle.as_deref(),
        body.link.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: BannerSlide::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/admin/banners/:id
pub(super) async fn replace_banner_slide(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<BannerSlidePayload>,
) -> Result<Json<ApiResponse<BannerSlide>>, ApiError> {
    if body.image.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "image must not be blank",
        ));
    }

    let row = shopfront_db::replace_banner_slide(
        &state.pool,
        id,
        &body.image,
        body.title.as_deref(),
        body.subtitle.as_deref(),
        body.link.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "banner slide not found"))?;

    Ok(Json(ApiResponse {
        data: BannerSlide::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/banners/:id
pub(super) async fn delete_banner_slide(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = shopfront_db::delete_banner_slide(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "banner slide not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

// ---------------------------------------------------------------------------
// Menu items
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct MenuItemPayload {
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub position: i32,
}

impl MenuItemPayload {
    fn validate(&self, req_id: &str) -> Result<(), ApiError> {
        if self.label.trim().is_empty() {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                "label must not be blank",
            ));
        }
        if self.path.trim().is_empty() {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                "path must not be blank",
            ));
        }
        Ok(())
    }
}

/// POST /api/v1/admin/menu-items
pub(super) async fn create_menu_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<MenuItemPayload>,
) -> Result<(StatusCode, Json<ApiResponse<MenuItem>>), ApiError> {
    body.validate(&req_id.0)?;

    let row = shopfront_db::create_menu_item(&state.pool, &body.label, &body.path, body.position)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: MenuItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/admin/menu-items/:id
pub(super) async fn replace_menu_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<MenuItemPayload>,
) -> Result<Json<ApiResponse<MenuItem>>, ApiError> {
    body.validate(&req_id.0)?;

    let row =
        shopfront_db::replace_menu_item(&state.pool, id, &body.label, &body.path, body.position)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?
            .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "menu item not found"))?;

    Ok(Json(ApiResponse {
        data: MenuItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/menu-items/:id
pub(super) async fn delete_menu_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = shopfront_db::delete_menu_item(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "menu item not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct ContactPayload {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /api/v1/contacts — the public contact form.
pub(super) async fn create_contact(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ContactPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Contact>>), ApiError> {
    for (field, value) in [
        ("name", &body.name),
        ("phone", &body.phone),
        ("address", &body.address),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                format!("{field} must not be blank"),
            ));
        }
    }

    let row = shopfront_db::create_contact(
        &state.pool,
        body.name.trim(),
        body.phone.trim(),
        body.address.trim(),
        body.email.as_deref().map(str::trim).filter(|e| !e.is_empty()),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: Contact::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/admin/contacts
pub(super) async fn list_contacts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Contact>>>, ApiError> {
    let rows = shopfront_db::list_contacts(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(Contact::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/contacts/:id
pub(super) async fn delete_contact(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = shopfront_db::delete_contact(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "contact not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
