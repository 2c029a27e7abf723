mod common;

use common::{TestApp, TEST_PASSWORD};
use rust_decimal_macros::dec;
use stockflow_api::entities::product::ProductStatus;
use stockflow_api::errors::ServiceError;
use stockflow_api::services::conversion::UnitMode;
use stockflow_api::services::gate_pass::{GatePassInput, GatePassLineInput};
use stockflow_api::services::profile::UpdateShopProfileInput;

fn input_for(lines: Vec<GatePassLineInput>) -> GatePassInput {
    GatePassInput {
        customer: "Acme Traders".to_string(),
        authorized_by: "R. Singh".to_string(),
        dispatch_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        reason: Some("Customer order".to_string()),
        password: TEST_PASSWORD.to_string(),
        lines,
    }
}

#[tokio::test]
async fn two_line_issuance_shares_one_pass_id() {
    let app = TestApp::new().await;
    let cement = app.create_product("Cement", "CEM-43", dec!(10), 12).await;
    let rope = app.create_product("Rope", "ROPE-1", dec!(20), 1).await;

    let issued = app
        .services
        .gate_passes
        .issue(
            &app.current_user(),
            input_for(vec![
                GatePassLineInput {
                    product_id: cement.id,
                    quantity: dec!(5),
                    unit_mode: UnitMode::Main,
                },
                GatePassLineInput {
                    product_id: rope.id,
                    quantity: dec!(8),
                    unit_mode: UnitMode::Pieces,
                },
            ]),
        )
        .await
        .expect("issuance should succeed");

    assert!(issued.pass_id.starts_with("GP-"));
    assert_eq!(issued.rows.len(), 2);
    assert!(issued
        .rows
        .iter()
        .all(|row| row.gate_pass_id == issued.pass_id));

    // Exactly one decrement per line.
    assert_eq!(app.reload_product(cement.id).await.stock_quantity, dec!(5));
    assert_eq!(app.reload_product(rope.id).await.stock_quantity, dec!(12));

    // The piece line snapshots the canonical piece unit; the main line the
    // product's own unit.
    let rope_row = issued
        .rows
        .iter()
        .find(|r| r.product_id == rope.id)
        .unwrap();
    assert_eq!(rope_row.unit_id, "pcs");
    let cement_row = issued
        .rows
        .iter()
        .find(|r| r.product_id == cement.id)
        .unwrap();
    assert_eq!(cement_row.unit_name, "Box");

    let grouped = app
        .services
        .audit
        .find_by_gate_pass(app.owner(), &issued.pass_id)
        .await
        .unwrap();
    assert_eq!(grouped.len(), 2);

    // Lines come back in the same order the issuance rendered them, even
    // when rows committed in one transaction share a timestamp.
    let issued_ids: Vec<_> = issued.rows.iter().map(|r| r.id).collect();
    let grouped_ids: Vec<_> = grouped.iter().map(|r| r.id).collect();
    assert_eq!(grouped_ids, issued_ids);

    // Every row snapshots the dispatch date from the form.
    assert!(issued
        .rows
        .iter()
        .all(|r| r.dispatch_date == chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()));
}

#[tokio::test]
async fn wrong_password_aborts_with_zero_mutations() {
    let app = TestApp::new().await;
    let cement = app.create_product("Cement", "CEM-43", dec!(10), 12).await;

    let mut input = input_for(vec![GatePassLineInput {
        product_id: cement.id,
        quantity: dec!(5),
        unit_mode: UnitMode::Main,
    }]);
    input.password = "not-the-password".to_string();

    let err = app
        .services
        .gate_passes
        .issue(&app.current_user(), input)
        .await
        .expect_err("wrong password must fail");
    assert!(matches!(err, ServiceError::InvalidCredential));

    let unchanged = app.reload_product(cement.id).await;
    assert_eq!(unchanged.stock_quantity, dec!(10));
    assert_eq!(unchanged.status, ProductStatus::InStock);

    let (rows, total) = app
        .services
        .audit
        .list_outgoing(app.owner(), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn validation_failure_precedes_everything() {
    let app = TestApp::new().await;
    let cement = app.create_product("Cement", "CEM-43", dec!(10), 12).await;

    let mut input = input_for(vec![GatePassLineInput {
        product_id: cement.id,
        quantity: dec!(5),
        unit_mode: UnitMode::Main,
    }]);
    input.customer = "   ".to_string();
    // Even a wrong password never gets checked when the form is invalid.
    input.password = "irrelevant".to_string();

    let err = app
        .services
        .gate_passes
        .issue(&app.current_user(), input)
        .await
        .expect_err("blank customer must fail");
    match err {
        ServiceError::ValidationError(msg) => assert!(msg.contains("customer")),
        other => panic!("expected ValidationError, got {:?}", other),
    }

    assert_eq!(app.reload_product(cement.id).await.stock_quantity, dec!(10));
}

#[tokio::test]
async fn infeasible_line_rolls_back_the_whole_pass() {
    let app = TestApp::new().await;
    let cement = app.create_product("Cement", "CEM-43", dec!(10), 12).await;
    let rope = app.create_product("Rope", "ROPE-1", dec!(2), 1).await;

    let err = app
        .services
        .gate_passes
        .issue(
            &app.current_user(),
            input_for(vec![
                GatePassLineInput {
                    product_id: cement.id,
                    quantity: dec!(5),
                    unit_mode: UnitMode::Main,
                },
                // More than available: fails after the first line applied.
                GatePassLineInput {
                    product_id: rope.id,
                    quantity: dec!(3),
                    unit_mode: UnitMode::Main,
                },
            ]),
        )
        .await
        .expect_err("second line must sink the pass");
    match &err {
        ServiceError::InsufficientStock(msg) => {
            // The message names the item, so the caller knows which line sank
            // the pass, and carries the available amount.
            assert!(msg.contains("Rope"), "message should name the item: {}", msg);
            assert!(msg.contains('2'), "message should carry availability: {}", msg);
        }
        other => panic!("expected InsufficientStock, got {:?}", other),
    }

    // First line's decrement was rolled back with the rest.
    assert_eq!(app.reload_product(cement.id).await.stock_quantity, dec!(10));
    assert_eq!(app.reload_product(rope.id).await.stock_quantity, dec!(2));

    let (_, total) = app
        .services
        .audit
        .list_outgoing(app.owner(), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn reprint_is_identical_to_the_issued_document() {
    let app = TestApp::new().await;
    app.services
        .profile
        .upsert_shop(
            app.owner(),
            UpdateShopProfileInput {
                shop_name: "Sharma Hardware".to_string(),
                contact_number: Some("+91 98765 43210".to_string()),
                address: Some("12 Market Road".to_string()),
            },
        )
        .await
        .unwrap();
    let cement = app.create_product("Cement", "CEM-43", dec!(10), 12).await;
    let rope = app.create_product("Rope", "ROPE-1", dec!(20), 1).await;

    let issued = app
        .services
        .gate_passes
        .issue(
            &app.current_user(),
            input_for(vec![
                GatePassLineInput {
                    product_id: cement.id,
                    quantity: dec!(4),
                    unit_mode: UnitMode::Main,
                },
                GatePassLineInput {
                    product_id: rope.id,
                    quantity: dec!(8),
                    unit_mode: UnitMode::Pieces,
                },
            ]),
        )
        .await
        .unwrap();

    assert!(issued.document.contains("Sharma Hardware"));
    assert!(issued.document.contains(&issued.pass_id));
    assert!(issued.document.contains("Dispatch  : 2024-03-05"));
    for line in issued.document.lines() {
        assert!(line.chars().count() <= 42, "line too wide: {:?}", line);
    }

    let (view, reprint) = app
        .services
        .gate_passes
        .get_pass(app.owner(), &issued.pass_id)
        .await
        .expect("pass should be reconstructible from its rows");
    assert_eq!(reprint, issued.document);
    assert_eq!(view.scan_payload(), issued.pass_id);
    assert_eq!(view.total_quantity(), dec!(12));

    // Deleting the product does not erase the pass history.
    app.services
        .products
        .delete(app.owner(), cement.id)
        .await
        .unwrap();
    let (_, reprint_after_delete) = app
        .services
        .gate_passes
        .get_pass(app.owner(), &issued.pass_id)
        .await
        .unwrap();
    assert_eq!(reprint_after_delete, issued.document);
}

#[tokio::test]
async fn unknown_pass_id_is_not_found() {
    let app = TestApp::new().await;

    let err = app
        .services
        .gate_passes
        .get_pass(app.owner(), "GP-0")
        .await
        .expect_err("unknown pass must fail");
    assert!(matches!(err, ServiceError::NotFound(_)));
}
