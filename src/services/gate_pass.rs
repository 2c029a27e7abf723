//! Gate pass issuance: the re-authentication-gated workflow that turns a
//! cart of product lines into committed stock decrements, outgoing-log rows,
//! and a printable document.
//!
//! All lines commit inside one database transaction. A failing line (for
//! example insufficient stock) rolls back every line, so a gate pass is
//! all-or-nothing and no compensation pass is ever needed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthService, AuthUser};
use crate::db::DbPool;
use crate::entities::product::{self, ProductStatus};
use crate::entities::shop_profile::{self, Entity as ShopProfiles};
use crate::entities::outgoing_stock_log;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::metrics;
use crate::services::audit::{self, NewOutgoingEntry};
use crate::services::conversion::UnitMode;
use crate::services::document::{self, GatePassView, ShopDetails};
use crate::services::stock;

/// Canonical piece unit snapshotted onto outgoing rows for piece issuance.
const PIECE_UNIT_ID: &str = "pcs";
const PIECE_UNIT_NAME: &str = "Piece";
const PIECE_UNIT_ABBREVIATION: &str = "pcs";

/// One cart line of an issuance request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GatePassLineInput {
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_mode: UnitMode,
}

/// A full issuance request. The password is re-verified against the current
/// user's stored credential before anything is written.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GatePassInput {
    pub customer: String,
    pub authorized_by: String,
    pub dispatch_date: NaiveDate,
    pub reason: Option<String>,
    pub password: String,
    pub lines: Vec<GatePassLineInput>,
}

/// The committed result of an issuance.
#[derive(Debug, Clone)]
pub struct IssuedGatePass {
    pub pass_id: String,
    pub document: String,
    pub view: GatePassView,
    pub rows: Vec<outgoing_stock_log::Model>,
}

#[derive(Clone)]
pub struct GatePassService {
    db: Arc<DbPool>,
    auth: Arc<AuthService>,
    event_sender: Option<EventSender>,
}

impl GatePassService {
    pub fn new(db: Arc<DbPool>, auth: Arc<AuthService>, event_sender: Option<EventSender>) -> Self {
        Self {
            db,
            auth,
            event_sender,
        }
    }

    /// Issue a gate pass for the current user's account.
    ///
    /// Order of operations: form validation (no I/O), password
    /// re-verification, then one transaction containing every per-line
    /// decrement and outgoing-log append. The document is rendered from the
    /// committed rows, never from the request.
    #[instrument(skip(self, input), fields(user = %current_user.email, lines = input.lines.len()))]
    pub async fn issue(
        &self,
        current_user: &AuthUser,
        input: GatePassInput,
    ) -> Result<IssuedGatePass, ServiceError> {
        let timer = metrics::GATE_PASS_ISSUE_DURATION.start_timer();

        validate_input(&input).map_err(|e| {
            metrics::GATE_PASS_FAILURES_TOTAL
                .with_label_values(&["validation"])
                .inc();
            e
        })?;

        if let Err(e) = self
            .auth
            .reauthenticate(&current_user.email, &input.password)
            .await
        {
            metrics::GATE_PASS_FAILURES_TOTAL
                .with_label_values(&["reauth"])
                .inc();
            warn!(user = %current_user.email, "Gate pass re-authentication failed");
            return Err(e);
        }

        let owner_id = current_user.user_id;
        let pass_id = mint_pass_id();
        let txn_pass_id = pass_id.clone();
        let txn_input = input.clone();

        let (updated_products, rows) = self
            .db
            .transaction::<_, (Vec<product::Model>, Vec<outgoing_stock_log::Model>), ServiceError>(
                |txn| {
                    Box::pin(async move {
                        let mut updated_products = Vec::with_capacity(txn_input.lines.len());
                        let mut rows = Vec::with_capacity(txn_input.lines.len());

                        for line in &txn_input.lines {
                            let (updated, plan) = stock::apply_issue(
                                txn,
                                owner_id,
                                line.product_id,
                                line.quantity,
                                line.unit_mode,
                            )
                            .await?;

                            let (unit_id, unit_name, unit_abbreviation) = match line.unit_mode {
                                UnitMode::Main => (
                                    updated.unit_id.to_string(),
                                    updated.unit_name.clone(),
                                    updated.unit_abbreviation.clone(),
                                ),
                                UnitMode::Pieces => (
                                    PIECE_UNIT_ID.to_string(),
                                    PIECE_UNIT_NAME.to_string(),
                                    Some(PIECE_UNIT_ABBREVIATION.to_string()),
                                ),
                            };

                            let row = audit::record_outgoing(
                                txn,
                                NewOutgoingEntry {
                                    owner_id,
                                    product_id: updated.id,
                                    product_name: updated.name.clone(),
                                    sku: Some(updated.sku.clone()),
                                    quantity_removed: plan.quantity_removed,
                                    unit_id,
                                    unit_name,
                                    unit_abbreviation,
                                    destination: Some(txn_input.customer.clone()),
                                    reason: txn_input.reason.clone(),
                                    gate_pass_id: txn_pass_id.clone(),
                                    issued_to: txn_input.authorized_by.clone(),
                                    dispatch_date: txn_input.dispatch_date,
                                },
                            )
                            .await?;

                            updated_products.push(updated);
                            rows.push(row);
                        }

                        Ok((updated_products, rows))
                    })
                },
            )
            .await
            .map_err(|e| {
                metrics::GATE_PASS_FAILURES_TOTAL
                    .with_label_values(&["commit"])
                    .inc();
                stock::unwrap_transaction_error(e)
            })?;

        metrics::GATE_PASSES_ISSUED_TOTAL.inc();
        metrics::STOCK_ISSUES_TOTAL.inc_by(rows.len() as u64);
        timer.observe_duration();

        info!(
            pass_id = %pass_id,
            lines = rows.len(),
            customer = %input.customer,
            "Gate pass issued"
        );

        self.emit_issue_events(&pass_id, &input, &updated_products, &rows)
            .await;

        // Render from the same (logged_at, id) order the reprint query uses,
        // so rows that share a timestamp cannot reorder between prints.
        let mut rows = rows;
        rows.sort_by(|a, b| a.logged_at.cmp(&b.logged_at).then(a.id.cmp(&b.id)));

        let shop = self.shop_details(owner_id).await?;
        let view = GatePassView::from_rows(&rows).ok_or_else(|| {
            ServiceError::InternalError("Issued gate pass has no lines".to_string())
        })?;
        let document = document::render_document(&shop, &view);

        Ok(IssuedGatePass {
            pass_id,
            document,
            view,
            rows,
        })
    }

    /// Reconstruct a pass from its log rows. Used for scanned-id lookup and
    /// history views; reprints are byte-identical to the original.
    #[instrument(skip(self))]
    pub async fn get_pass(
        &self,
        owner_id: Uuid,
        pass_id: &str,
    ) -> Result<(GatePassView, String), ServiceError> {
        let rows = outgoing_stock_log::Entity::find()
            .filter(outgoing_stock_log::Column::OwnerId.eq(owner_id))
            .filter(outgoing_stock_log::Column::GatePassId.eq(pass_id))
            .order_by_asc(outgoing_stock_log::Column::LoggedAt)
            .order_by_asc(outgoing_stock_log::Column::Id)
            .all(&*self.db)
            .await?;

        let view = GatePassView::from_rows(&rows)
            .ok_or_else(|| ServiceError::NotFound(format!("Gate pass {} not found", pass_id)))?;
        let shop = self.shop_details(owner_id).await?;
        let document = document::render_document(&shop, &view);

        Ok((view, document))
    }

    async fn shop_details(&self, owner_id: Uuid) -> Result<ShopDetails, ServiceError> {
        let profile = ShopProfiles::find()
            .filter(shop_profile::Column::OwnerId.eq(owner_id))
            .one(&*self.db)
            .await?;

        Ok(match profile {
            Some(p) => ShopDetails {
                shop_name: p.shop_name,
                address: p.address,
                contact_number: p.contact_number,
            },
            None => ShopDetails::default(),
        })
    }

    async fn emit_issue_events(
        &self,
        pass_id: &str,
        input: &GatePassInput,
        products: &[product::Model],
        rows: &[outgoing_stock_log::Model],
    ) {
        let Some(sender) = &self.event_sender else {
            return;
        };

        for (product, row) in products.iter().zip(rows) {
            let event = Event::StockIssued {
                product_id: product.id,
                quantity_removed: row.quantity_removed,
                new_quantity: product.stock_quantity,
                gate_pass_id: pass_id.to_string(),
            };
            if let Err(e) = sender.send(event).await {
                warn!("Failed to send stock issued event: {}", e);
            }
            if product.status == ProductStatus::LowStock
                || product.status == ProductStatus::OutOfStock
            {
                let _ = sender
                    .send(Event::LowStock {
                        product_id: product.id,
                        stock_quantity: product.stock_quantity,
                    })
                    .await;
            }
        }

        if let Err(e) = sender
            .send(Event::GatePassIssued {
                gate_pass_id: pass_id.to_string(),
                line_count: rows.len(),
                issued_to: input.authorized_by.clone(),
            })
            .await
        {
            warn!("Failed to send gate pass event: {}", e);
        }
    }
}

fn mint_pass_id() -> String {
    format!("GP-{}", chrono::Utc::now().timestamp_millis())
}

fn validate_input(input: &GatePassInput) -> Result<(), ServiceError> {
    if input.customer.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "customer is required".to_string(),
        ));
    }
    if input.authorized_by.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "authorized_by is required".to_string(),
        ));
    }
    if input.lines.is_empty() {
        return Err(ServiceError::ValidationError(
            "at least one line is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_input() -> GatePassInput {
        GatePassInput {
            customer: "Acme Traders".to_string(),
            authorized_by: "R. Singh".to_string(),
            dispatch_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            reason: None,
            password: "secret".to_string(),
            lines: vec![GatePassLineInput {
                product_id: Uuid::new_v4(),
                quantity: dec!(1),
                unit_mode: UnitMode::Main,
            }],
        }
    }

    #[test]
    fn pass_id_format() {
        let id = mint_pass_id();
        assert!(id.starts_with("GP-"));
        assert!(id[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn validation_names_the_missing_field() {
        let mut input = base_input();
        input.customer = "  ".to_string();
        match validate_input(&input).unwrap_err() {
            ServiceError::ValidationError(msg) => assert!(msg.contains("customer")),
            other => panic!("unexpected error: {:?}", other),
        }

        let mut input = base_input();
        input.authorized_by = String::new();
        assert!(matches!(
            validate_input(&input),
            Err(ServiceError::ValidationError(_))
        ));

        let mut input = base_input();
        input.lines.clear();
        match validate_input(&input).unwrap_err() {
            ServiceError::ValidationError(msg) => assert!(msg.contains("line")),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(validate_input(&base_input()).is_ok());
    }
}
