mod common;

use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use stockflow_api::entities::product::ProductStatus;
use stockflow_api::errors::ServiceError;
use stockflow_api::services::conversion::UnitMode;
use stockflow_api::services::stock::RestockInput;

fn march(day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

#[tokio::test]
async fn main_unit_issue_reduces_stock() {
    let app = TestApp::new().await;
    let product = app.create_product("Cement", "CEM-43", dec!(10), 12).await;

    let updated = app
        .services
        .stock
        .issue(app.owner(), product.id, dec!(5), UnitMode::Main)
        .await
        .expect("issue should succeed");

    assert_eq!(updated.stock_quantity, dec!(5));
    assert_eq!(updated.status, ProductStatus::InStock);
}

#[tokio::test]
async fn piece_issue_can_empty_the_product() {
    let app = TestApp::new().await;
    let product = app.create_product("Cement", "CEM-43", dec!(10), 12).await;

    let updated = app
        .services
        .stock
        .issue(app.owner(), product.id, dec!(120), UnitMode::Pieces)
        .await
        .expect("issue should succeed");

    assert_eq!(updated.stock_quantity, Decimal::ZERO);
    assert_eq!(updated.status, ProductStatus::OutOfStock);
}

#[tokio::test]
async fn piece_issue_over_available_fails_and_leaves_stock_untouched() {
    let app = TestApp::new().await;
    let product = app.create_product("Cement", "CEM-43", dec!(10), 12).await;

    let err = app
        .services
        .stock
        .issue(app.owner(), product.id, dec!(125), UnitMode::Pieces)
        .await
        .expect_err("issue should fail");

    match err {
        ServiceError::InsufficientStock(msg) => {
            assert!(msg.contains("Cement"), "message should name the item: {}", msg);
            assert!(msg.contains("120"));
        }
        other => panic!("expected InsufficientStock, got {:?}", other),
    }

    let unchanged = app.reload_product(product.id).await;
    assert_eq!(unchanged.stock_quantity, dec!(10));
    assert_eq!(unchanged.status, ProductStatus::InStock);
}

#[tokio::test]
async fn single_piece_per_unit_behaves_like_main_mode() {
    let app = TestApp::new().await;
    let by_main = app.create_product("Rope A", "ROPE-A", dec!(7), 1).await;
    let by_pieces = app.create_product("Rope B", "ROPE-B", dec!(7), 1).await;

    let a = app
        .services
        .stock
        .issue(app.owner(), by_main.id, dec!(3), UnitMode::Main)
        .await
        .unwrap();
    let b = app
        .services
        .stock
        .issue(app.owner(), by_pieces.id, dec!(3), UnitMode::Pieces)
        .await
        .unwrap();

    assert_eq!(a.stock_quantity, b.stock_quantity);
    assert_eq!(a.status, b.status);
}

#[tokio::test]
async fn fractional_piece_issue_round_trips_in_piece_space() {
    let app = TestApp::new().await;
    let product = app.create_product("Cement", "CEM-43", dec!(10), 12).await;

    let updated = app
        .services
        .stock
        .issue(app.owner(), product.id, dec!(6), UnitMode::Pieces)
        .await
        .unwrap();

    assert_eq!(updated.stock_quantity * dec!(12), dec!(114));
}

#[tokio::test]
async fn restock_writes_receipt_and_rederives_status() {
    let app = TestApp::new().await;
    let product = app
        .create_product_with_threshold("Cement", "CEM-43", dec!(10), 12, Some(dec!(5)))
        .await;

    // Empty the product first.
    app.services
        .stock
        .issue(app.owner(), product.id, dec!(10), UnitMode::Main)
        .await
        .unwrap();

    // A small top-up lands inside the low-stock band.
    let (updated, receipt) = app
        .services
        .stock
        .restock(
            app.owner(),
            RestockInput {
                product_id: product.id,
                quantity: dec!(3),
                arrival_date: march(5),
                po_number: Some("PO-7".to_string()),
                supplier: Some("Acme Supplies".to_string()),
            },
        )
        .await
        .expect("restock should succeed");

    assert_eq!(updated.stock_quantity, dec!(3));
    assert_eq!(updated.status, ProductStatus::LowStock);
    assert_eq!(receipt.quantity_added, dec!(3));
    assert_eq!(receipt.product_name, "Cement");
    assert_eq!(receipt.arrival_date, march(5));
    assert!(receipt.logged_at <= chrono::Utc::now());

    // A larger top-up clears the band.
    let (updated, _) = app
        .services
        .stock
        .restock(
            app.owner(),
            RestockInput {
                product_id: product.id,
                quantity: dec!(10),
                arrival_date: march(6),
                po_number: None,
                supplier: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, ProductStatus::InStock);

    let (receipts, total) = app
        .services
        .audit
        .list_incoming(app.owner(), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(receipts.len(), 2);

    let summary = app
        .services
        .audit
        .dashboard_summary(app.owner())
        .await
        .unwrap();
    assert_eq!(summary.incoming_entry_count, 2);
    assert_eq!(summary.incoming_quantity_total, dec!(13));
    assert_eq!(summary.outgoing_entry_count, 0);
    assert_eq!(summary.outgoing_quantity_total, Decimal::ZERO);
}

#[tokio::test]
async fn non_positive_quantities_are_rejected() {
    let app = TestApp::new().await;
    let product = app.create_product("Cement", "CEM-43", dec!(10), 12).await;

    let err = app
        .services
        .stock
        .receive(app.owner(), product.id, Decimal::ZERO)
        .await
        .expect_err("zero quantity must fail");
    assert!(matches!(err, ServiceError::InvalidQuantity(_)));

    let err = app
        .services
        .stock
        .issue(app.owner(), product.id, dec!(-2), UnitMode::Main)
        .await
        .expect_err("negative quantity must fail");
    assert!(matches!(err, ServiceError::InvalidQuantity(_)));

    let unchanged = app.reload_product(product.id).await;
    assert_eq!(unchanged.stock_quantity, dec!(10));
}

#[tokio::test]
async fn unknown_product_reports_not_found() {
    let app = TestApp::new().await;

    let err = app
        .services
        .stock
        .receive(app.owner(), uuid::Uuid::new_v4(), dec!(1))
        .await
        .expect_err("missing product must fail");
    assert!(matches!(err, ServiceError::NotFound(_)));
}
