use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::entities::product;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::products::CreateProductInput;
use crate::{ApiResponse, PaginatedResponse};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/low-stock", get(low_stock_products))
        .route("/:id", get(get_product).delete(delete_product))
        .route("/:id/history", get(product_history))
}

/// List products, newest first
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductFilters),
    responses(
        (status = 200, description = "Product list returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filters): Query<ProductFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = filters.page.unwrap_or(1);
    let per_page = filters.per_page.unwrap_or(20);
    let (items, total) = state
        .services
        .products
        .list(user.user_id, filters.category, page, per_page)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(per_page.max(1)),
        items,
        total,
        page,
        limit: per_page,
    })))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate SKU", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateProductInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.products.create(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Fetch one product
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product returned", body = product::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let found = state.services.products.get(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// Delete a product; its stock log history stays readable
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.products.delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Products at or below their low-stock threshold
#[utoipa::path(
    get,
    path = "/api/v1/products/low-stock",
    responses((status = 200, description = "Low stock products returned")),
    tag = "products"
)]
pub async fn low_stock_products(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state.services.products.low_stock(user.user_id).await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Incoming and outgoing movements for one product
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/history",
    params(("id" = Uuid, Path, description = "Product id")),
    responses((status = 200, description = "Movement history returned")),
    tag = "products"
)]
pub async fn product_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let history = state
        .services
        .audit
        .product_history(user.user_id, id)
        .await?;
    Ok(Json(ApiResponse::success(history)))
}
