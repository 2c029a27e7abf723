//! Shop profile management: shop details, units, and the employee
//! pick-list used as gate-pass authorizers.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::employee::{self, Entity as Employees};
use crate::entities::shop_profile::{self, Entity as ShopProfiles};
use crate::entities::unit::{self, Entity as Units};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateShopProfileInput {
    #[validate(length(min = 1, max = 120))]
    pub shop_name: String,
    #[validate(length(max = 40))]
    pub contact_number: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUnitInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(max = 10))]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeeInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[derive(Clone)]
pub struct ProfileService {
    db: Arc<DbPool>,
}

impl ProfileService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn get_shop(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<shop_profile::Model>, ServiceError> {
        Ok(ShopProfiles::find()
            .filter(shop_profile::Column::OwnerId.eq(owner_id))
            .one(&*self.db)
            .await?)
    }

    /// Create or replace the account's shop details.
    #[instrument(skip(self, input))]
    pub async fn upsert_shop(
        &self,
        owner_id: Uuid,
        input: UpdateShopProfileInput,
    ) -> Result<shop_profile::Model, ServiceError> {
        input.validate()?;

        let existing = self.get_shop(owner_id).await?;
        let updated = match existing {
            Some(profile) => {
                let mut active: shop_profile::ActiveModel = profile.into();
                active.shop_name = Set(input.shop_name);
                active.contact_number = Set(input.contact_number);
                active.address = Set(input.address);
                active.updated_at = Set(Some(Utc::now()));
                active.update(&*self.db).await?
            }
            None => {
                let model = shop_profile::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    owner_id: Set(owner_id),
                    shop_name: Set(input.shop_name),
                    contact_number: Set(input.contact_number),
                    address: Set(input.address),
                    created_at: Set(Utc::now()),
                    updated_at: Set(None),
                };
                model.insert(&*self.db).await?
            }
        };

        info!(owner_id = %owner_id, "Shop profile saved");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn list_units(&self, owner_id: Uuid) -> Result<Vec<unit::Model>, ServiceError> {
        Ok(Units::find()
            .filter(unit::Column::OwnerId.eq(owner_id))
            .order_by_asc(unit::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input))]
    pub async fn create_unit(
        &self,
        owner_id: Uuid,
        input: CreateUnitInput,
    ) -> Result<unit::Model, ServiceError> {
        input.validate()?;

        let duplicate = Units::find()
            .filter(unit::Column::OwnerId.eq(owner_id))
            .filter(unit::Column::Name.eq(&input.name))
            .one(&*self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Unit {} already exists",
                input.name
            )));
        }

        let model = unit::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(input.name),
            abbreviation: Set(input.abbreviation),
            created_at: Set(Utc::now()),
        };
        Ok(model.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_employees(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<employee::Model>, ServiceError> {
        Ok(Employees::find()
            .filter(employee::Column::OwnerId.eq(owner_id))
            .order_by_asc(employee::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input))]
    pub async fn create_employee(
        &self,
        owner_id: Uuid,
        input: CreateEmployeeInput,
    ) -> Result<employee::Model, ServiceError> {
        input.validate()?;

        let model = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(input.name),
            created_at: Set(Utc::now()),
        };
        Ok(model.insert(&*self.db).await?)
    }
}
