mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::{Extension, Router};
use rust_decimal_macros::dec;
use tower::ServiceExt;

use common::TestApp;
use stockflow_api::config::AppConfig;
use stockflow_api::handlers;
use stockflow_api::services::conversion::UnitMode;
use stockflow_api::services::gate_pass::{GatePassInput, GatePassLineInput};
use stockflow_api::{metrics, AppState};

fn app_state(app: &TestApp) -> AppState {
    let cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        "test_secret_key_for_testing_purposes_only".to_string(),
        0,
        "test".to_string(),
    );
    AppState::new(app.db.clone(), cfg, app.auth.clone(), None)
}

/// The business routers with the current user injected directly, bypassing
/// the bearer middleware. Exercises the real route table.
fn business_router(app: &TestApp) -> Router {
    Router::new()
        .nest("/products", handlers::products::products_routes())
        .nest("/gate-passes", handlers::gate_passes::gate_pass_routes())
        .layer(Extension(app.current_user()))
        .with_state(app_state(app))
}

async fn get(router: Router, uri: &str) -> axum::response::Response {
    router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn path_parameters_reach_the_product_handlers() {
    let app = TestApp::new().await;
    let product = app.create_product("Cement", "CEM-43", dec!(10), 12).await;
    let router = business_router(&app);

    let response = get(router.clone(), &format!("/products/{}", product.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        router.clone(),
        &format!("/products/{}/history", product.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn scanned_pass_id_resolves_to_lookup_and_reprint() {
    let app = TestApp::new().await;
    let cement = app.create_product("Cement", "CEM-43", dec!(10), 12).await;
    let issued = app
        .services
        .gate_passes
        .issue(
            &app.current_user(),
            GatePassInput {
                customer: "Acme Traders".to_string(),
                authorized_by: "R. Singh".to_string(),
                dispatch_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                reason: None,
                password: common::TEST_PASSWORD.to_string(),
                lines: vec![GatePassLineInput {
                    product_id: cement.id,
                    quantity: dec!(4),
                    unit_mode: UnitMode::Main,
                }],
            },
        )
        .await
        .unwrap();

    let router = business_router(&app);

    let response = get(router.clone(), &format!("/gate-passes/{}", issued.pass_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        router.clone(),
        &format!("/gate-passes/{}/document", issued.pass_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn request_counter_tracks_served_routes() {
    let app = TestApp::new().await;
    let router = stockflow_api::app(app_state(&app));

    let counter = metrics::HTTP_REQUESTS_TOTAL.with_label_values(&["GET", "/api/v1/status", "200"]);
    let before = counter.get();

    let response = get(router, "/api/v1/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(counter.get(), before + 1);
}
