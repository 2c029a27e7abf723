use axum::{extract::State, response::IntoResponse, routing::get, Extension, Json, Router};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::ApiResponse;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/summary", get(summary))
}

/// Headline counts for the dashboard, derived from the stock ledger
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/summary",
    responses(
        (status = 200, description = "Summary returned", body = crate::services::audit::DashboardSummary)
    ),
    tag = "dashboard"
)]
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.audit.dashboard_summary(user.user_id).await?;
    Ok(Json(ApiResponse::success(summary)))
}
