use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::entities::outgoing_stock_log;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::gate_pass::GatePassInput;
use crate::ApiResponse;

/// A gate pass as returned to clients: the committed rows, their
/// aggregation, and the printable document.
#[derive(Debug, Serialize, ToSchema)]
pub struct GatePassResponse {
    pub pass_id: String,
    /// Raw pass id; encode this (and nothing else) into the QR/barcode.
    pub scan_payload: String,
    pub issued_at: DateTime<Utc>,
    pub dispatch_date: NaiveDate,
    pub customer: String,
    pub authorized_by: String,
    pub line_count: usize,
    pub total_quantity: Decimal,
    pub lines: Vec<outgoing_stock_log::Model>,
    pub document: String,
}

pub fn gate_pass_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(issue_gate_pass))
        .route("/:id", get(get_gate_pass))
        .route("/:id/document", get(get_gate_pass_document))
}

/// Issue a gate pass.
///
/// The request carries the user's current password; it is re-verified
/// against the stored credential before any stock is touched. All lines
/// commit or none do.
#[utoipa::path(
    post,
    path = "/api/v1/gate-passes",
    request_body = GatePassInput,
    responses(
        (status = 201, description = "Gate pass issued", body = GatePassResponse),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 401, description = "Wrong password", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "gate-passes"
)]
pub async fn issue_gate_pass(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<GatePassInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let issued = state.services.gate_passes.issue(&user, input).await?;

    let response = GatePassResponse {
        pass_id: issued.pass_id.clone(),
        scan_payload: issued.view.scan_payload().to_string(),
        issued_at: issued.view.issued_at,
        dispatch_date: issued.view.dispatch_date,
        customer: issued.view.customer.clone(),
        authorized_by: issued.view.authorized_by.clone(),
        line_count: issued.rows.len(),
        total_quantity: issued.view.total_quantity(),
        lines: issued.rows,
        document: issued.document,
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// Look up a gate pass by its (scanned) id
#[utoipa::path(
    get,
    path = "/api/v1/gate-passes/{id}",
    params(("id" = String, Path, description = "Gate pass id, e.g. GP-1700000000000")),
    responses(
        (status = 200, description = "Gate pass returned", body = GatePassResponse),
        (status = 404, description = "Unknown gate pass", body = crate::errors::ErrorResponse)
    ),
    tag = "gate-passes"
)]
pub async fn get_gate_pass(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let (view, document) = state.services.gate_passes.get_pass(user.user_id, &id).await?;
    let rows = state.services.audit.find_by_gate_pass(user.user_id, &id).await?;

    let response = GatePassResponse {
        pass_id: view.pass_id.clone(),
        scan_payload: view.scan_payload().to_string(),
        issued_at: view.issued_at,
        dispatch_date: view.dispatch_date,
        customer: view.customer.clone(),
        authorized_by: view.authorized_by.clone(),
        line_count: rows.len(),
        total_quantity: view.total_quantity(),
        lines: rows,
        document,
    };

    Ok(Json(ApiResponse::success(response)))
}

/// Reprint the document for a gate pass as plain text
#[utoipa::path(
    get,
    path = "/api/v1/gate-passes/{id}/document",
    params(("id" = String, Path, description = "Gate pass id")),
    responses(
        (status = 200, description = "Document returned", body = String, content_type = "text/plain"),
        (status = 404, description = "Unknown gate pass", body = crate::errors::ErrorResponse)
    ),
    tag = "gate-passes"
)]
pub async fn get_gate_pass_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let (_, document) = state.services.gate_passes.get_pass(user.user_id, &id).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        document,
    ))
}
