use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of a stock receipt. Product and unit fields are
/// denormalized snapshots taken at write time; rows are never updated or
/// deleted, even if the product later disappears.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "incoming_stock_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub owner_id: Uuid,

    pub product_id: Uuid,
    pub product_name: String,
    pub sku: Option<String>,

    /// Quantity received, in main units. Always positive.
    pub quantity_added: Decimal,

    pub unit_id: Uuid,
    pub unit_name: String,
    pub unit_abbreviation: Option<String>,

    /// Business date the goods arrived (caller-supplied)
    pub arrival_date: NaiveDate,

    pub po_number: Option<String>,
    pub supplier: Option<String>,

    /// System timestamp of entry creation
    pub logged_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
