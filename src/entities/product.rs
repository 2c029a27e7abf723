use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Product entity. The unit fields are a snapshot of the unit chosen at
/// creation/edit time; renaming a unit later never changes existing rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning account
    pub owner_id: Uuid,

    /// Product name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// SKU (Stock Keeping Unit)
    #[validate(length(
        min = 1,
        max = 100,
        message = "SKU must be between 1 and 100 characters"
    ))]
    pub sku: String,

    /// Product category
    #[validate(length(min = 1, max = 100))]
    pub category: String,

    /// Current stock in main units. Never negative; may be fractional after
    /// a piece-based issuance.
    pub stock_quantity: Decimal,

    /// Snapshot of the main unit
    pub unit_id: Uuid,
    pub unit_name: String,
    pub unit_abbreviation: Option<String>,

    /// Conversion factor from one main unit to pieces
    pub pieces_per_unit: i32,

    /// Price per main unit
    pub price: Decimal,

    /// Derived stock status
    pub status: ProductStatus,

    /// Stock at or below this level (and above zero) reports LowStock
    pub low_stock_threshold: Option<Decimal>,

    /// URL to the product image in external object storage (opaque)
    pub image_url: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

/// Derived product stock status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ProductStatus {
    #[sea_orm(string_value = "in_stock")]
    InStock,
    #[sea_orm(string_value = "low_stock")]
    LowStock,
    #[sea_orm(string_value = "out_of_stock")]
    OutOfStock,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.created_at {
                active_model.created_at = Set(Utc::now());
            }
        }

        active_model.updated_at = Set(Some(Utc::now()));

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(DbErr::Custom(format!("Validation error: {}", err)));
        }
        if model.stock_quantity < Decimal::ZERO {
            return Err(DbErr::Custom(
                "Validation error: stock_quantity cannot be negative".to_string(),
            ));
        }
        if model.pieces_per_unit < 1 {
            return Err(DbErr::Custom(
                "Validation error: pieces_per_unit must be at least 1".to_string(),
            ));
        }

        Ok(active_model)
    }
}
