//! Product management: creation (with the unit snapshot), lookup, listing,
//! deletion, and the low-stock report.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::product::{self, Entity as Products};
use crate::entities::unit::{self, Entity as Units};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::conversion;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    /// Unit to snapshot onto the product.
    pub unit_id: Uuid,
    #[validate(range(min = 1))]
    pub pieces_per_unit: i32,
    pub price: Decimal,
    /// Opening stock in main units. Defaults to zero.
    pub initial_stock: Option<Decimal>,
    pub low_stock_threshold: Option<Decimal>,
    pub image_url: Option<String>,
}

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Create a product, snapshotting the chosen unit's name and
    /// abbreviation so later unit renames never rewrite history.
    #[instrument(skip(self, input), fields(owner_id = %owner_id, sku = %input.sku))]
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let initial_stock = input.initial_stock.unwrap_or(Decimal::ZERO);
        if initial_stock < Decimal::ZERO {
            return Err(ServiceError::InvalidQuantity(
                "initial_stock cannot be negative".to_string(),
            ));
        }

        let unit = Units::find_by_id(input.unit_id)
            .filter(unit::Column::OwnerId.eq(owner_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Unit {} not found", input.unit_id)))?;

        let duplicate = Products::find()
            .filter(product::Column::OwnerId.eq(owner_id))
            .filter(product::Column::Sku.eq(&input.sku))
            .one(&*self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A product with SKU {} already exists",
                input.sku
            )));
        }

        let status = conversion::derive_status(initial_stock, input.low_stock_threshold);
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(input.name),
            sku: Set(input.sku),
            category: Set(input.category),
            stock_quantity: Set(initial_stock),
            unit_id: Set(unit.id),
            unit_name: Set(unit.name),
            unit_abbreviation: Set(unit.abbreviation),
            pieces_per_unit: Set(input.pieces_per_unit),
            price: Set(input.price),
            status: Set(status),
            low_stock_threshold: Set(input.low_stock_threshold),
            image_url: Set(input.image_url),
            ..Default::default()
        };

        let created = model.insert(&*self.db).await?;
        info!(product_id = %created.id, "Product created");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::ProductCreated(created.id)).await {
                warn!("Failed to send product created event: {}", e);
            }
        }

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, owner_id: Uuid, product_id: Uuid) -> Result<product::Model, ServiceError> {
        Products::find_by_id(product_id)
            .filter(product::Column::OwnerId.eq(owner_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    /// Paginated listing, newest first, optionally filtered by category.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        owner_id: Uuid,
        category: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let mut query = Products::find().filter(product::Column::OwnerId.eq(owner_id));
        if let Some(category) = category {
            query = query.filter(product::Column::Category.eq(category));
        }
        let paginator = query
            .order_by_desc(product::Column::CreatedAt)
            .paginate(&*self.db, per_page.max(1));

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Products in the low-stock or out-of-stock band.
    #[instrument(skip(self))]
    pub async fn low_stock(&self, owner_id: Uuid) -> Result<Vec<product::Model>, ServiceError> {
        let items = Products::find()
            .filter(product::Column::OwnerId.eq(owner_id))
            .filter(product::Column::Status.is_in([
                product::ProductStatus::LowStock,
                product::ProductStatus::OutOfStock,
            ]))
            .order_by_asc(product::Column::StockQuantity)
            .all(&*self.db)
            .await?;
        Ok(items)
    }

    /// Delete a product. Stock log rows keep their denormalized snapshots,
    /// so history for the product stays readable.
    #[instrument(skip(self))]
    pub async fn delete(&self, owner_id: Uuid, product_id: Uuid) -> Result<(), ServiceError> {
        let product = self.get(owner_id, product_id).await?;
        let id = product.id;
        product::ActiveModel::from(product).delete(&*self.db).await?;
        info!(product_id = %id, "Product deleted");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::ProductDeleted(id)).await {
                warn!("Failed to send product deleted event: {}", e);
            }
        }

        Ok(())
    }
}
