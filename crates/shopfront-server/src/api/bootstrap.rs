use axum::{extract::State, Extension, Json};
use serde::Serialize;
use shopfront_core::{BannerSlide, Category, MenuItem, Product};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Everything the storefront needs on first paint.
#[derive(Debug, Serialize)]
pub(super) struct BootstrapData {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub banner_slides: Vec<BannerSlide>,
    pub menu_items: Vec<MenuItem>,
}

/// GET /api/v1/bootstrap — the four initial loads fired concurrently.
pub(super) async fn get_bootstrap(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<BootstrapData>>, ApiError> {
    let (products, categories, banner_slides, menu_items) = tokio::try_join!(
        shopfront_db::list_products(&state.pool),
        shopfront_db::list_categories(&state.pool),
        shopfront_db::list_banner_slides(&state.pool),
        shopfront_db::list_menu_items(&state.pool),
    )
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: BootstrapData {
            products: products.into_iter().map(Product::from).collect(),
            categories: categories.into_iter().map(Category::from).collect(),
            banner_slides: banner_slides.into_iter().map(BannerSlide::from).collect(),
            menu_items: menu_items.into_iter().map(MenuItem::from).collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
