mod bootstrap;
mod cart;
mod categories;
mod checkout;
mod content;
mod orders;
mod products;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shopfront_core::OrderNotifier;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};
use crate::sessions::SessionStore;

pub use checkout::LogNotifier;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub sessions: SessionStore,
    pub notifier: Arc<dyn OrderNotifier>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &shopfront_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn unknown_session(request_id: &str) -> ApiError {
    ApiError::new(request_id, "not_found", "unknown session")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn storefront_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/bootstrap", get(bootstrap::get_bootstrap))
        .route("/api/v1/products", get(products::list_products))
        .route("/api/v1/products/{id}", get(products::get_product))
        .route("/api/v1/categories", get(categories::list_categories))
        .route("/api/v1/contacts", post(content::create_contact))
        .route("/api/v1/sessions", post(cart::create_session))
        .route(
            "/api/v1/sessions/{session_id}/cart",
            get(cart::get_cart).delete(cart::clear_cart),
        )
        .route(
            "/api/v1/sessions/{session_id}/cart/items",
            post(cart::add_to_cart),
        )
        .route(
            "/api/v1/sessions/{session_id}/cart/items/{product_id}",
            axum::routing::patch(cart::update_quantity).delete(cart::remove_from_cart),
        )
        .route(
            "/api/v1/sessions/{session_id}/cart/drawer",
            put(cart::set_drawer),
        )
        .route(
            "/api/v1/sessions/{session_id}/wishlist",
            get(cart::list_wishlist),
        )
        .route(
            "/api/v1/sessions/{session_id}/wishlist/toggle",
            post(cart::toggle_wishlist),
        )
        .route(
            "/api/v1/sessions/{session_id}/compare",
            get(cart::list_compare).delete(cart::clear_compare),
        )
        .route(
            "/api/v1/sessions/{session_id}/compare/toggle",
            post(cart::toggle_compare),
        )
        .route(
            "/api/v1/sessions/{session_id}/compare/items/{product_id}",
            delete(cart::remove_from_compare),
        )
        .route(
            "/api/v1/sessions/{session_id}/checkout",
            post(checkout::session_checkout),
        )
        .route("/api/v1/checkout/express", post(checkout::express_checkout))
}

fn admin_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/admin/products", post(products::create_product))
        .route(
            "/api/v1/admin/products/{id}",
            put(products::replace_product).delete(products::delete_product),
        )
        .route(
            "/api/v1/admin/categories",
            post(categories::create_category),
        )
        .route(
            "/api/v1/admin/categories/{id}",
            put(categories::replace_category).delete(categories::delete_category),
        )
        .route("/api/v1/admin/banners", post(content::create_banner_slide))
        .route(
            "/api/v1/admin/banners/{id}",
            put(content::replace_banner_slide).delete(content::delete_banner_slide),
        )
        .route("/api/v1/admin/menu-items", post(content::create_menu_item))
        .route(
            "/api/v1/admin/menu-items/{id}",
            put(content::replace_menu_item).delete(content::delete_menu_item),
        )
        .route("/api/v1/admin/contacts", get(content::list_contacts))
        .route(
            "/api/v1/admin/contacts/{id}",
            delete(content::delete_contact),
        )
        .route("/api/v1/admin/orders", get(orders::list_orders))
        .route(
            "/api/v1/admin/orders/{id}",
            get(orders::get_order).delete(orders::delete_order),
        )
        .route(
            "/api/v1/admin/orders/{id}/status",
            axum::routing::patch(orders::update_order_status),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .merge(storefront_router())
        .merge(admin_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match shopfront_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(pool: sqlx::PgPool) -> AppState {
        AppState {
            pool,
            sessions: SessionStore::new(None),
            notifier: Arc::new(shopfront_core::NoopNotifier),
        }
    }

    fn test_app(pool: sqlx::PgPool) -> Router {
        let auth = AuthState::from_env(true).expect("auth");
        let rate_limit = RateLimitState::new(120, Duration::from_secs(60));
        build_app(test_state(pool), auth, rate_limit)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response")
    }

    async fn get(app: &Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    async fn seed_product(pool: &sqlx::PgPool, title: &str, price: i64, category: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO products \
             (title, price, description, category, image, images, rating_rate, rating_count, colors, sizes) \
             VALUES ($1, $2, '', $3, '', '[]'::jsonb, 0, 0, '[]'::jsonb, '[]'::jsonb) \
             RETURNING id",
        )
        .bind(title)
        .bind(Decimal::from(price))
        .bind(category)
        .fetch_one(pool)
        .await
        .expect("seed product")
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok_with_envelope(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = get(&app, "/api/v1/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let id_header = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned)
            .expect("x-request-id header");
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["request_id"], id_header.as_str());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn products_list_applies_catalog_pipeline(pool: sqlx::PgPool) {
        seed_product(&pool, "Cheap Hammer", 5, "Tools").await;
        seed_product(&pool, "Pricey Hammer", 50, "Tools").await;
        seed_product(&pool, "Garden Hose", 20, "Garden").await;

        let app = test_app(pool);
        let response = get(&app, "/api/v1/products?category=Tools&sort=price-desc").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let titles: Vec<&str> = json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .map(|p| p["title"].as_str().expect("title"))
            .collect();
        assert_eq!(titles, vec!["Pricey Hammer", "Cheap Hammer"]);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn product_get_returns_404_for_unknown_id(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = get(&app, "/api/v1/products/999999").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn bootstrap_returns_all_four_collections(pool: sqlx::PgPool) {
        seed_product(&pool, "Hammer", 5, "Tools").await;
        let app = test_app(pool);
        let response = get(&app, "/api/v1/bootstrap").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["products"].as_array().map(Vec::len), Some(1));
        assert!(json["data"]["categories"].is_array());
        assert!(json["data"]["banner_slides"].is_array());
        assert!(json["data"]["menu_items"].is_array());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn cart_flow_add_update_remove(pool: sqlx::PgPool) {
        let product_id = seed_product(&pool, "Hammer", 10, "Tools").await;
        let app = test_app(pool);

        let created = post_json(&app, "/api/v1/sessions", json!({})).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let session_id = body_json(created).await["data"]["session_id"]
            .as_str()
            .expect("session id")
            .to_owned();

        // Two adds of the same product merge into one line of quantity 2.
        let uri = format!("/api/v1/sessions/{session_id}/cart/items");
        post_json(&app, &uri, json!({ "product_id": product_id })).await;
        let response = post_json(&app, &uri, json!({ "product_id": product_id })).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cart = body_json(response).await;
        assert_eq!(cart["data"]["items"].as_array().map(Vec::len), Some(1));
        assert_eq!(cart["data"]["items"][0]["quantity"], 2);
        assert_eq!(cart["data"]["item_count"], 2);
        assert_eq!(cart["data"]["drawer_open"], true);

        // A huge negative delta clamps at quantity 1, not removal.
        let item_uri = format!("/api/v1/sessions/{session_id}/cart/items/{product_id}");
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(&item_uri)
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "delta": -100 }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");
        let cart = body_json(response).await;
        assert_eq!(cart["data"]["items"][0]["quantity"], 1);
        assert_eq!(cart["data"]["total"], "10");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(&item_uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let cart = body_json(response).await;
        assert_eq!(cart["data"]["items"].as_array().map(Vec::len), Some(0));
        assert_eq!(cart["data"]["total"], "0");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn cart_route_rejects_unknown_session(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let uri = format!("/api/v1/sessions/{}/cart", uuid::Uuid::new_v4());
        let response = get(&app, &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn compare_rejects_fifth_product(pool: sqlx::PgPool) {
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(seed_product(&pool, &format!("Product {i}"), 10, "Tools").await);
        }
        let app = test_app(pool);
        let created = post_json(&app, "/api/v1/sessions", json!({})).await;
        let session_id = body_json(created).await["data"]["session_id"]
            .as_str()
            .expect("session id")
            .to_owned();

        let uri = format!("/api/v1/sessions/{session_id}/compare/toggle");
        for id in &ids[..4] {
            let response = post_json(&app, &uri, json!({ "product_id": id })).await;
            assert_eq!(body_json(response).await["data"]["outcome"], "added");
        }
        let response = post_json(&app, &uri, json!({ "product_id": ids[4] })).await;
        let json = body_json(response).await;
        assert_eq!(json["data"]["outcome"], "rejected");
        // The rejection evicted nothing: all four originals are still there.
        assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(4));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn checkout_persists_order_and_clears_cart(pool: sqlx::PgPool) {
        let product_id = seed_product(&pool, "Hammer", 10, "Tools").await;
        let app = test_app(pool);
        let created = post_json(&app, "/api/v1/sessions", json!({})).await;
        let session_id = body_json(created).await["data"]["session_id"]
            .as_str()
            .expect("session id")
            .to_owned();

        post_json(
            &app,
            &format!("/api/v1/sessions/{session_id}/cart/items"),
            json!({ "product_id": product_id }),
        )
        .await;

        let form = json!({
            "name": "Ada Lovelace",
            "phone": "555-0100",
            "address": "1 Analytical Way",
            "email": "ada@example.com"
        });
        let response = post_json(
            &app,
            &format!("/api/v1/sessions/{session_id}/checkout"),
            form,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "pending");
        assert_eq!(json["data"]["total"], "10");
        assert_eq!(json["data"]["payment_method"], "Cash on Delivery");

        let cart = get(&app, &format!("/api/v1/sessions/{session_id}/cart")).await;
        let cart = body_json(cart).await;
        assert_eq!(cart["data"]["items"].as_array().map(Vec::len), Some(0));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn checkout_with_invalid_form_leaves_cart_untouched(pool: sqlx::PgPool) {
        let product_id = seed_product(&pool, "Hammer", 10, "Tools").await;
        let app = test_app(pool);
        let created = post_json(&app, "/api/v1/sessions", json!({})).await;
        let session_id = body_json(created).await["data"]["session_id"]
            .as_str()
            .expect("session id")
            .to_owned();

        post_json(
            &app,
            &format!("/api/v1/sessions/{session_id}/cart/items"),
            json!({ "product_id": product_id }),
        )
        .await;

        let response = post_json(
            &app,
            &format!("/api/v1/sessions/{session_id}/checkout"),
            json!({ "name": "", "phone": "555", "address": "x" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let cart = get(&app, &format!("/api/v1/sessions/{session_id}/cart")).await;
        let cart = body_json(cart).await;
        assert_eq!(cart["data"]["items"].as_array().map(Vec::len), Some(1));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn duplicate_checkout_posts_create_two_orders(pool: sqlx::PgPool) {
        // No idempotency key anywhere in the flow, so a double-submit of the
        // same express payload lands twice.
        let product_id = seed_product(&pool, "Hammer", 10, "Tools").await;
        let app = test_app(pool.clone());

        let payload = json!({
            "product_id": product_id,
            "quantity": 1,
            "name": "Ada Lovelace",
            "phone": "555-0100",
            "address": "1 Analytical Way"
        });
        for _ in 0..2 {
            let response = post_json(&app, "/api/v1/checkout/express", payload.clone()).await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 2);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn admin_routes_reject_without_bearer_when_auth_enabled(pool: sqlx::PgPool) {
        let auth = AuthState::with_keys(["secret-token".to_owned()]);

        let app = build_app(
            test_state(pool),
            auth,
            RateLimitState::new(120, Duration::from_secs(60)),
        );
        let response = get(&app, "/api/v1/admin/orders").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/admin/orders")
                    .header("authorization", "Bearer secret-token")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn admin_product_create_returns_canonical_record(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = post_json(
            &app,
            "/api/v1/admin/products",
            json!({
                "title": "New Drill",
                "price": "129.99",
                "category": "Power Tools",
                "description": "Cordless",
                "image": "https://cdn.example.com/drill.jpg"
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert!(json["data"]["id"].as_i64().expect("id") > 0);
        assert_eq!(json["data"]["title"], "New Drill");
        assert_eq!(json["data"]["price"], "129.99");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn admin_product_create_rejects_blank_title(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = post_json(
            &app,
            "/api/v1/admin/products",
            json!({ "title": "  ", "price": "10", "category": "Tools" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn admin_order_status_roundtrip(pool: sqlx::PgPool) {
        let product_id = seed_product(&pool, "Hammer", 10, "Tools").await;
        let app = test_app(pool);

        let response = post_json(
            &app,
            "/api/v1/checkout/express",
            json!({
                "product_id": product_id,
                "quantity": 2,
                "name": "Ada Lovelace",
                "phone": "555-0100",
                "address": "1 Analytical Way"
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let order_id = body_json(response).await["data"]["id"]
            .as_i64()
            .expect("order id");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/v1/admin/orders/{order_id}/status"))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "status": "shipped" }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["status"], "shipped");

        let response = get(&app, &format!("/api/v1/admin/orders/{order_id}")).await;
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "shipped");
        assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["data"]["total"], "20");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn admin_order_status_rejects_unknown_value(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/v1/admin/orders/1/status")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "status": "teleported" }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
