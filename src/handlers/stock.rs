use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthUser;
use crate::entities::{incoming_stock_log, product};
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::stock::RestockInput;
use crate::{ApiResponse, PaginatedResponse};

#[derive(Debug, Deserialize, IntoParams)]
pub struct LogFilters {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestockResponse {
    pub product: product::Model,
    pub receipt: incoming_stock_log::Model,
}

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/receipts", get(list_receipts).post(restock))
        .route("/issues", get(list_issues))
}

/// Restock a product and record the receipt
#[utoipa::path(
    post,
    path = "/api/v1/stock/receipts",
    request_body = RestockInput,
    responses(
        (status = 201, description = "Stock received", body = RestockResponse),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn restock(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<RestockInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let (product, receipt) = state.services.stock.restock(user.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RestockResponse { product, receipt })),
    ))
}

/// Incoming stock receipts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/stock/receipts",
    params(LogFilters),
    responses((status = 200, description = "Receipts returned")),
    tag = "stock"
)]
pub async fn list_receipts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filters): Query<LogFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = filters.page.unwrap_or(1);
    let per_page = filters.per_page.unwrap_or(20);
    let (items, total) = state
        .services
        .audit
        .list_incoming(user.user_id, page, per_page)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(per_page.max(1)),
        items,
        total,
        page,
        limit: per_page,
    })))
}

/// Outgoing stock issues, newest first
#[utoipa::path(
    get,
    path = "/api/v1/stock/issues",
    params(LogFilters),
    responses((status = 200, description = "Issues returned")),
    tag = "stock"
)]
pub async fn list_issues(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filters): Query<LogFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = filters.page.unwrap_or(1);
    let per_page = filters.per_page.unwrap_or(20);
    let (items, total) = state
        .services
        .audit
        .list_outgoing(user.user_id, page, per_page)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        total_pages: total.div_ceil(per_page.max(1)),
        items,
        total,
        page,
        limit: per_page,
    })))
}
