use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shopfront_core::{filter_and_sort, CatalogQuery, Product, Rating, VariantOption};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Request body for admin product writes. The id always comes from the path
/// or the database, never the payload.
#[derive(Debug, Deserialize)]
pub(super) struct ProductPayload {
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub ft_url: Option<String>,
    #[serde(default)]
    pub fi_url: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub colors: Vec<VariantOption>,
    #[serde(default)]
    pub sizes: Vec<VariantOption>,
}

impl ProductPayload {
    fn validate(&self, req_id: &str) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                "title must not be blank",
            ));
        }
        if self.category.trim().is_empty() {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                "category must not be blank",
            ));
        }
        if self.price < Decimal::ZERO {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                "price must not be negative",
            ));
        }
        Ok(())
    }

    fn into_product(self, id: i64) -> Product {
        Product {
            id,
            title: self.title.trim().to_owned(),
            price: self.price,
            original_price: self.original_price,
            description: self.description,
            category: self.category.trim().to_owned(),
            image: self.image,
            images: self.images,
            rating: self.rating,
            ft_url: self.ft_url,
            fi_url: self.fi_url,
            stock: self.stock,
            colors: self.colors,
            sizes: self.sizes,
        }
    }
}

/// GET /api/v1/products — the full catalog run through the filter pipeline.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let rows = shopfront_db::list_products(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let products: Vec<Product> = rows.into_iter().map(Product::from).collect();
    let data = filter_and_sort(&products, &query);

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/products/:id
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let row = shopfront_db::get_product(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "product not found"))?;

    Ok(Json(ApiResponse {
        data: Product::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/products — create, returning the stored record.
pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ProductPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    body.validate(&req_id.0)?;

    let row = shopfront_db::insert_product(&state.pool, &body.into_product(0))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: Product::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/admin/products/:id — full replace, returning the stored record.
pub(super) async fn replace_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<ProductPayload>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    body.validate(&req_id.0)?;

    let row = shopfront_db::replace_product(&state.pool, id, &body.into_product(id))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "product not found"))?;

    Ok(Json(ApiResponse {
        data: Product::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/products/:id
pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let deleted = shopfront_db::delete_product(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "product not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
