//! Stock ledger mutations: restock increments and issuance decrements.
//!
//! Every mutation is read-validate-write inside a database transaction, so a
//! product can never persist with negative stock and nothing is written when
//! validation fails.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionError, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::incoming_stock_log;
use crate::entities::product::{self, Entity as Products, ProductStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::metrics;
use crate::services::audit::{self, NewIncomingEntry};
use crate::services::conversion::{self, IssuePlan, UnitMode};

/// A restock request: quantity in main units plus receipt metadata.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RestockInput {
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub arrival_date: NaiveDate,
    pub po_number: Option<String>,
    pub supplier: Option<String>,
}

/// Applies stock deltas to products and keeps the derived status in step.
#[derive(Clone)]
pub struct StockLedgerService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl StockLedgerService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Restock: add `quantity` main units to the product's stock.
    #[instrument(skip(self), fields(owner_id = %owner_id, product_id = %product_id))]
    pub async fn receive(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
        quantity: Decimal,
    ) -> Result<product::Model, ServiceError> {
        let updated = self
            .db
            .transaction::<_, product::Model, ServiceError>(|txn| {
                Box::pin(
                    async move { apply_receive(txn, owner_id, product_id, quantity).await },
                )
            })
            .await
            .map_err(unwrap_transaction_error)?;

        metrics::STOCK_RECEIPTS_TOTAL.inc();
        info!(
            product_id = %updated.id,
            new_stock = %updated.stock_quantity,
            "Stock received"
        );
        self.emit(Event::StockReceived {
            product_id: updated.id,
            quantity_added: quantity,
            new_quantity: updated.stock_quantity,
        })
        .await;
        self.emit_low_stock_if_needed(&updated).await;

        Ok(updated)
    }

    /// Issuance: remove `quantity` (in `mode` units) from the product's stock.
    #[instrument(skip(self), fields(owner_id = %owner_id, product_id = %product_id))]
    pub async fn issue(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
        quantity: Decimal,
        mode: UnitMode,
    ) -> Result<product::Model, ServiceError> {
        let (updated, _plan) = self
            .db
            .transaction::<_, (product::Model, IssuePlan), ServiceError>(|txn| {
                Box::pin(async move {
                    apply_issue(txn, owner_id, product_id, quantity, mode).await
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        metrics::STOCK_ISSUES_TOTAL.inc();
        info!(
            product_id = %updated.id,
            new_stock = %updated.stock_quantity,
            "Stock issued"
        );
        self.emit_low_stock_if_needed(&updated).await;

        Ok(updated)
    }

    /// Restock plus its incoming-log receipt in one transaction.
    #[instrument(skip(self, input), fields(owner_id = %owner_id, product_id = %input.product_id))]
    pub async fn restock(
        &self,
        owner_id: Uuid,
        input: RestockInput,
    ) -> Result<(product::Model, incoming_stock_log::Model), ServiceError> {
        let txn_input = input.clone();
        let (updated, log) = self
            .db
            .transaction::<_, (product::Model, incoming_stock_log::Model), ServiceError>(|txn| {
                Box::pin(async move {
                    let updated =
                        apply_receive(txn, owner_id, txn_input.product_id, txn_input.quantity)
                            .await?;
                    let log = audit::record_incoming(
                        txn,
                        NewIncomingEntry {
                            owner_id,
                            product_id: updated.id,
                            product_name: updated.name.clone(),
                            sku: Some(updated.sku.clone()),
                            quantity_added: txn_input.quantity,
                            unit_id: updated.unit_id,
                            unit_name: updated.unit_name.clone(),
                            unit_abbreviation: updated.unit_abbreviation.clone(),
                            arrival_date: txn_input.arrival_date,
                            po_number: txn_input.po_number,
                            supplier: txn_input.supplier,
                        },
                    )
                    .await?;
                    Ok((updated, log))
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        metrics::STOCK_RECEIPTS_TOTAL.inc();
        info!(
            product_id = %updated.id,
            new_stock = %updated.stock_quantity,
            "Stock received"
        );
        self.emit(Event::StockReceived {
            product_id: updated.id,
            quantity_added: input.quantity,
            new_quantity: updated.stock_quantity,
        })
        .await;
        self.emit_low_stock_if_needed(&updated).await;

        Ok((updated, log))
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("Failed to send stock event: {}", e);
            }
        }
    }

    async fn emit_low_stock_if_needed(&self, product: &product::Model) {
        if product.status == ProductStatus::LowStock
            || product.status == ProductStatus::OutOfStock
        {
            self.emit(Event::LowStock {
                product_id: product.id,
                stock_quantity: product.stock_quantity,
            })
            .await;
        }
    }
}

pub(crate) fn unwrap_transaction_error(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Connection(e) => ServiceError::DatabaseError(e),
        TransactionError::Transaction(e) => e,
    }
}

/// Load a product scoped to its owner.
pub(crate) async fn load_product<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    product_id: Uuid,
) -> Result<product::Model, ServiceError> {
    Products::find_by_id(product_id)
        .filter(product::Column::OwnerId.eq(owner_id))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
}

/// Restock increment against an existing connection or transaction.
pub(crate) async fn apply_receive<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
) -> Result<product::Model, ServiceError> {
    if quantity <= Decimal::ZERO {
        return Err(ServiceError::InvalidQuantity(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }

    let product = load_product(conn, owner_id, product_id).await?;
    let new_stock = product.stock_quantity + quantity;
    persist_stock(conn, product, new_stock).await
}

/// Issuance decrement against an existing connection or transaction.
/// Returns the updated product and the plan (for audit snapshots).
pub(crate) async fn apply_issue<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
    mode: UnitMode,
) -> Result<(product::Model, IssuePlan), ServiceError> {
    let product = load_product(conn, owner_id, product_id).await?;
    let plan = conversion::plan_issue(
        product.stock_quantity,
        product.pieces_per_unit,
        quantity,
        mode,
    )
    .map_err(|err| match err {
        // Name the item so a multi-line issuance failure points at its line
        ServiceError::InsufficientStock(detail) => {
            ServiceError::InsufficientStock(format!("for {}: {}", product.name, detail))
        }
        other => other,
    })?;
    let updated = persist_stock(conn, product, plan.new_stock).await?;
    Ok((updated, plan))
}

/// Write the new stock level and rederived status. Only `stock_quantity`,
/// `status`, and `updated_at` change on the row.
async fn persist_stock<C: ConnectionTrait>(
    conn: &C,
    product: product::Model,
    new_stock: Decimal,
) -> Result<product::Model, ServiceError> {
    let status = conversion::derive_status(new_stock, product.low_stock_threshold);

    let mut active: product::ActiveModel = product.into();
    active.stock_quantity = Set(new_stock);
    active.status = Set(status);

    Ok(active.update(conn).await?)
}
