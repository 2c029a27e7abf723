use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::profile::{CreateEmployeeInput, CreateUnitInput, UpdateShopProfileInput};
use crate::ApiResponse;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/shop", get(get_shop).put(update_shop))
        .route("/units", get(list_units).post(create_unit))
        .route("/employees", get(list_employees).post(create_employee))
}

/// Shop details printed on gate passes
#[utoipa::path(
    get,
    path = "/api/v1/profile/shop",
    responses((status = 200, description = "Shop profile returned")),
    tag = "profile"
)]
pub async fn get_shop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ServiceError> {
    match state.services.profile.get_shop(user.user_id).await? {
        Some(profile) => Ok(Json(ApiResponse::success(json!(profile)))),
        None => Ok(Json(ApiResponse::success(json!(null)))),
    }
}

/// Create or replace the shop details
#[utoipa::path(
    put,
    path = "/api/v1/profile/shop",
    request_body = UpdateShopProfileInput,
    responses(
        (status = 200, description = "Shop profile saved"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "profile"
)]
pub async fn update_shop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<UpdateShopProfileInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let saved = state.services.profile.upsert_shop(user.user_id, input).await?;
    Ok(Json(ApiResponse::success(saved)))
}

/// Units defined for this shop
#[utoipa::path(
    get,
    path = "/api/v1/profile/units",
    responses((status = 200, description = "Units returned")),
    tag = "profile"
)]
pub async fn list_units(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let units = state.services.profile.list_units(user.user_id).await?;
    Ok(Json(ApiResponse::success(units)))
}

/// Define a new unit
#[utoipa::path(
    post,
    path = "/api/v1/profile/units",
    request_body = CreateUnitInput,
    responses(
        (status = 201, description = "Unit created"),
        (status = 409, description = "Duplicate unit name", body = crate::errors::ErrorResponse)
    ),
    tag = "profile"
)]
pub async fn create_unit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateUnitInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.profile.create_unit(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Employees who may authorize gate passes
#[utoipa::path(
    get,
    path = "/api/v1/profile/employees",
    responses((status = 200, description = "Employees returned")),
    tag = "profile"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let employees = state.services.profile.list_employees(user.user_id).await?;
    Ok(Json(ApiResponse::success(employees)))
}

/// Add an employee to the authorizer pick-list
#[utoipa::path(
    post,
    path = "/api/v1/profile/employees",
    request_body = CreateEmployeeInput,
    responses((status = 201, description = "Employee created")),
    tag = "profile"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateEmployeeInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state
        .services
        .profile
        .create_employee(user.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}
