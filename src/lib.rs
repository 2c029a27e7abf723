/*!
 * Stockflow API
 *
 * Inventory and gate-pass management service for small shops: product
 * catalog with main-unit/piece conversion, an append-only stock ledger,
 * and re-authentication-gated gate pass issuance with printable documents.
 */

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod metrics;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Extension, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::{AuthRouterExt, AuthService, AuthUser};
use crate::handlers::AppServices;

/// Shared application state passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<db::DbPool>,
    pub config: config::AppConfig,
    pub event_sender: Option<events::EventSender>,
    pub auth: Arc<AuthService>,
    pub services: AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<db::DbPool>,
        config: config::AppConfig,
        auth: Arc<AuthService>,
        event_sender: Option<events::EventSender>,
    ) -> Self {
        let services = AppServices::new(db.clone(), auth.clone(), event_sender.clone());
        Self {
            db,
            config,
            event_sender,
            auth,
            services,
        }
    }
}

// Common query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// All `/api/v1` routes. Business routes sit behind the bearer-token
/// middleware; status and health stay open.
pub fn api_v1_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .nest("/products", handlers::products::products_routes())
        .nest("/stock", handlers::stock::stock_routes())
        .nest("/gate-passes", handlers::gate_passes::gate_pass_routes())
        .nest("/profile", handlers::profile::profile_routes())
        .nest("/dashboard", handlers::dashboard::dashboard_routes())
        .with_auth();

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/auth", auth::auth_routes().with_state(state.auth.clone()))
        .merge(protected)
}

/// Current authenticated user, from the validated token
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user returned"),
        (status = 401, description = "Unauthorized", body = errors::ErrorResponse)
    ),
    tag = "auth"
)]
async fn me(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(Json(ApiResponse::success(user)))
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let git = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "git": git,
        "build_time": build_time,
        "service": "stockflow-api",
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "stockflow-api",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/swagger-ui",
    }))
}

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    let auth_service = state.auth.clone();

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", api_v1_routes(&state))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(openapi::swagger_ui())
        .layer(Extension(auth_service))
        .layer(axum::middleware::from_fn(metrics::track_http_requests))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new())
        .with_state(state)
}
