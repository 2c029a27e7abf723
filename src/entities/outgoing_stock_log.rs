use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of a stock issuance. One row per gate-pass cart line;
/// rows sharing a `gate_pass_id` form one logical pass and are the durable
/// source for reprinting its document.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "outgoing_stock_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub owner_id: Uuid,

    pub product_id: Uuid,
    pub product_name: String,
    pub sku: Option<String>,

    /// Quantity removed, expressed in the unit actually issued. Always
    /// positive.
    pub quantity_removed: Decimal,

    /// The product's unit id, or "pcs" when issued by piece
    pub unit_id: String,
    pub unit_name: String,
    pub unit_abbreviation: Option<String>,

    /// Customer or destination of the goods
    pub destination: Option<String>,
    pub reason: Option<String>,

    /// Shared id grouping the lines of one gate pass (`GP-<millis>`)
    pub gate_pass_id: String,

    /// Authorizing party
    pub issued_to: String,

    /// Planned dispatch date captured from the issuance form
    pub dispatch_date: NaiveDate,

    /// System timestamp of entry creation
    pub logged_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
