use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use shopfront_core::Category;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CategoryPayload {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryPayload {
    fn validated_name(&self, req_id: &str) -> Result<&str, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                "name must not be blank",
            ));
        }
        Ok(name)
    }
}

fn map_unique_violation(req_id: &str, e: &shopfront_db::DbError) -> ApiError {
    if let shopfront_db::DbError::Sqlx(sqlx::Error::Database(db_err)) = e {
        if db_err.code().as_deref() == Some("23505") {
            return ApiError::new(req_id, "conflict", "a category with that name already exists");
        }
    }
    map_db_error(req_id.to_owned(), e)
}

/// GET /api/v1/categories — all categories with live product counts.
pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let rows = shopfront_db::list_categories(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(Category::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/categories
pub(super) async fn create_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), ApiError> {
    let name = body.validated_name(&req_id.0)?.to_owned();

    let row = shopfront_db::create_category(
        &state.pool,
        &name,
        &body.image,
        body.description.as_deref(),
    )
    .await
    .map_err(|e| map_unique_violation(&req_id.0, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: Category::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/admin/categories/:id
pub(super) async fn replace_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<CategoryPayload>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let name = body.validated_name(&req_id.0)?.to_owned();

    let row = shopfront_db::replace_category(
        &state.pool,
        id,
        &name,
        &body.image,
        body.description.as_deref(),
    )
    .await
    .map_err(|e| map_unique_violation(&req_id.0, &e))?
    .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "category not found"))?;

    Ok(Json(ApiResponse {
        data: Category::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/categories/:id
///
/// Products keep their free-text label; deleting a category never touches
/// them.
pub(super) async fn delete_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = shopfront_db::delete_category(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "category not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
