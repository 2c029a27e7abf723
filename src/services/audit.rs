//! Append-only audit trail of stock movements, and the query surface for
//! historical reporting built on top of it.
//!
//! Log rows are never updated or deleted. The write helpers take a generic
//! connection so the gate-pass orchestrator can append inside its own
//! transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::incoming_stock_log::{self, Entity as IncomingLogs};
use crate::entities::outgoing_stock_log::{self, Entity as OutgoingLogs};
use crate::entities::product::{self, Entity as Products};
use crate::errors::ServiceError;

/// Data for one incoming-log row; id and `logged_at` are assigned at write
/// time.
#[derive(Debug, Clone)]
pub struct NewIncomingEntry {
    pub owner_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: Option<String>,
    pub quantity_added: Decimal,
    pub unit_id: Uuid,
    pub unit_name: String,
    pub unit_abbreviation: Option<String>,
    pub arrival_date: NaiveDate,
    pub po_number: Option<String>,
    pub supplier: Option<String>,
}

/// Data for one outgoing-log row; id and `logged_at` are assigned at write
/// time. The unit fields describe the unit actually issued.
#[derive(Debug, Clone)]
pub struct NewOutgoingEntry {
    pub owner_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: Option<String>,
    pub quantity_removed: Decimal,
    pub unit_id: String,
    pub unit_name: String,
    pub unit_abbreviation: Option<String>,
    pub destination: Option<String>,
    pub reason: Option<String>,
    pub gate_pass_id: String,
    pub issued_to: String,
    pub dispatch_date: NaiveDate,
}

/// Append one incoming-log row.
pub(crate) async fn record_incoming<C: ConnectionTrait>(
    conn: &C,
    entry: NewIncomingEntry,
) -> Result<incoming_stock_log::Model, ServiceError> {
    if entry.quantity_added <= Decimal::ZERO {
        return Err(ServiceError::InvalidQuantity(format!(
            "quantity_added must be positive, got {}",
            entry.quantity_added
        )));
    }

    let model = incoming_stock_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(entry.owner_id),
        product_id: Set(entry.product_id),
        product_name: Set(entry.product_name),
        sku: Set(entry.sku),
        quantity_added: Set(entry.quantity_added),
        unit_id: Set(entry.unit_id),
        unit_name: Set(entry.unit_name),
        unit_abbreviation: Set(entry.unit_abbreviation),
        arrival_date: Set(entry.arrival_date),
        po_number: Set(entry.po_number),
        supplier: Set(entry.supplier),
        logged_at: Set(Utc::now()),
    };

    Ok(model.insert(conn).await?)
}

/// Append one outgoing-log row tagged with its gate pass id.
pub(crate) async fn record_outgoing<C: ConnectionTrait>(
    conn: &C,
    entry: NewOutgoingEntry,
) -> Result<outgoing_stock_log::Model, ServiceError> {
    if entry.quantity_removed <= Decimal::ZERO {
        return Err(ServiceError::InvalidQuantity(format!(
            "quantity_removed must be positive, got {}",
            entry.quantity_removed
        )));
    }

    let model = outgoing_stock_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(entry.owner_id),
        product_id: Set(entry.product_id),
        product_name: Set(entry.product_name),
        sku: Set(entry.sku),
        quantity_removed: Set(entry.quantity_removed),
        unit_id: Set(entry.unit_id),
        unit_name: Set(entry.unit_name),
        unit_abbreviation: Set(entry.unit_abbreviation),
        destination: Set(entry.destination),
        reason: Set(entry.reason),
        gate_pass_id: Set(entry.gate_pass_id),
        issued_to: Set(entry.issued_to),
        dispatch_date: Set(entry.dispatch_date),
        logged_at: Set(Utc::now()),
    };

    Ok(model.insert(conn).await?)
}

/// Dashboard headline numbers derived from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub product_count: u64,
    pub incoming_entry_count: u64,
    pub outgoing_entry_count: u64,
    pub gate_pass_count: u64,
    pub low_stock_product_count: u64,
    pub incoming_quantity_total: Decimal,
    pub outgoing_quantity_total: Decimal,
}

/// Combined per-product movement history.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductHistory {
    pub incoming: Vec<incoming_stock_log::Model>,
    pub outgoing: Vec<outgoing_stock_log::Model>,
}

/// Read side of the audit trail.
#[derive(Clone)]
pub struct AuditLogService {
    db: Arc<DbPool>,
}

impl AuditLogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Restock receipt written outside any larger transaction.
    pub async fn append_incoming(
        &self,
        entry: NewIncomingEntry,
    ) -> Result<incoming_stock_log::Model, ServiceError> {
        record_incoming(&*self.db, entry).await
    }

    /// Incoming receipts, newest first.
    #[instrument(skip(self))]
    pub async fn list_incoming(
        &self,
        owner_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<incoming_stock_log::Model>, u64), ServiceError> {
        let paginator = IncomingLogs::find()
            .filter(incoming_stock_log::Column::OwnerId.eq(owner_id))
            .order_by_desc(incoming_stock_log::Column::LoggedAt)
            .paginate(&*self.db, per_page.max(1));

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Outgoing issues, newest first.
    #[instrument(skip(self))]
    pub async fn list_outgoing(
        &self,
        owner_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<outgoing_stock_log::Model>, u64), ServiceError> {
        let paginator = OutgoingLogs::find()
            .filter(outgoing_stock_log::Column::OwnerId.eq(owner_id))
            .order_by_desc(outgoing_stock_log::Column::LoggedAt)
            .paginate(&*self.db, per_page.max(1));

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Every movement for one product, both directions, newest first.
    #[instrument(skip(self))]
    pub async fn product_history(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
    ) -> Result<ProductHistory, ServiceError> {
        let incoming = IncomingLogs::find()
            .filter(incoming_stock_log::Column::OwnerId.eq(owner_id))
            .filter(incoming_stock_log::Column::ProductId.eq(product_id))
            .order_by_desc(incoming_stock_log::Column::LoggedAt)
            .all(&*self.db)
            .await?;
        let outgoing = OutgoingLogs::find()
            .filter(outgoing_stock_log::Column::OwnerId.eq(owner_id))
            .filter(outgoing_stock_log::Column::ProductId.eq(product_id))
            .order_by_desc(outgoing_stock_log::Column::LoggedAt)
            .all(&*self.db)
            .await?;

        Ok(ProductHistory { incoming, outgoing })
    }

    /// All outgoing rows belonging to one gate pass, in write order.
    #[instrument(skip(self))]
    pub async fn find_by_gate_pass(
        &self,
        owner_id: Uuid,
        gate_pass_id: &str,
    ) -> Result<Vec<outgoing_stock_log::Model>, ServiceError> {
        let rows = OutgoingLogs::find()
            .filter(outgoing_stock_log::Column::OwnerId.eq(owner_id))
            .filter(outgoing_stock_log::Column::GatePassId.eq(gate_pass_id))
            .order_by_asc(outgoing_stock_log::Column::LoggedAt)
            .order_by_asc(outgoing_stock_log::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows)
    }

    /// Headline counts for the dashboard.
    #[instrument(skip(self))]
    pub async fn dashboard_summary(&self, owner_id: Uuid) -> Result<DashboardSummary, ServiceError> {
        let product_count = Products::find()
            .filter(product::Column::OwnerId.eq(owner_id))
            .count(&*self.db)
            .await?;
        let low_stock_product_count = Products::find()
            .filter(product::Column::OwnerId.eq(owner_id))
            .filter(
                product::Column::Status
                    .is_in([product::ProductStatus::LowStock, product::ProductStatus::OutOfStock]),
            )
            .count(&*self.db)
            .await?;
        let incoming_entry_count = IncomingLogs::find()
            .filter(incoming_stock_log::Column::OwnerId.eq(owner_id))
            .count(&*self.db)
            .await?;
        let outgoing_entry_count = OutgoingLogs::find()
            .filter(outgoing_stock_log::Column::OwnerId.eq(owner_id))
            .count(&*self.db)
            .await?;

        let passes: Vec<String> = OutgoingLogs::find()
            .select_only()
            .column(outgoing_stock_log::Column::GatePassId)
            .distinct()
            .filter(outgoing_stock_log::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .all(&*self.db)
            .await?;

        let incoming_quantity_total: Option<Decimal> = IncomingLogs::find()
            .select_only()
            .column_as(incoming_stock_log::Column::QuantityAdded.sum(), "total")
            .filter(incoming_stock_log::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .one(&*self.db)
            .await?
            .flatten();
        let outgoing_quantity_total: Option<Decimal> = OutgoingLogs::find()
            .select_only()
            .column_as(outgoing_stock_log::Column::QuantityRemoved.sum(), "total")
            .filter(outgoing_stock_log::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .one(&*self.db)
            .await?
            .flatten();

        Ok(DashboardSummary {
            product_count,
            incoming_entry_count,
            outgoing_entry_count,
            gate_pass_count: passes.len() as u64,
            low_stock_product_count,
            incoming_quantity_total: incoming_quantity_total.unwrap_or_default(),
            outgoing_quantity_total: outgoing_quantity_total.unwrap_or_default(),
        })
    }

    /// Earliest `logged_at` across a set of pass rows; used as the pass's
    /// issuance timestamp on reprint.
    pub fn pass_issued_at(rows: &[outgoing_stock_log::Model]) -> Option<DateTime<Utc>> {
        rows.iter().map(|r| r.logged_at).min()
    }
}
