//! SeaORM implementation of SupplierRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{DomainError, SupplierRepository};
use crate::models::SupplierInput;
use crate::models::supplier::{ActiveModel, Column, Entity as SupplierEntity, Model};
use crate::utils::dates::now_rfc3339;

/// SeaORM-based implementation of SupplierRepository
pub struct SeaOrmSupplierRepository {
    db: DatabaseConnection,
}

impl SeaOrmSupplierRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> Result<(), DomainError> {
        let mut query = SupplierEntity::find().filter(Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }
        if query.one(&self.db).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "A supplier named '{}' already exists",
                name
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SupplierRepository for SeaOrmSupplierRepository {
    async fn find_all(&self, active_only: bool) -> Result<Vec<Model>, DomainError> {
        let mut query = SupplierEntity::find();
        if active_only {
            query = query.filter(Column::IsActive.eq(true));
        }
        Ok(query.order_by_asc(Column::Name).all(&self.db).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Model>, DomainError> {
        Ok(SupplierEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, input: SupplierInput) -> Result<Model, DomainError> {
        let name = input.name.trim().to_string();
        self.ensure_name_free(&name, None).await?;

        let now = now_rfc3339();
        let supplier = ActiveModel {
            name: Set(name),
            contact_person: Set(input.contact_person),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(supplier.insert(&self.db).await?)
    }

    async fn update(&self, id: i32, input: SupplierInput) -> Result<Model, DomainError> {
        let existing = SupplierEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Supplier"))?;
        let name = input.name.trim().to_string();
        self.ensure_name_free(&name, Some(id)).await?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(name);
        active.contact_person = Set(input.contact_person);
        active.phone = Set(input.phone);
        active.email = Set(input.email);
        active.address = Set(input.address);
        active.updated_at = Set(now_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn deactivate(&self, id: i32) -> Result<(), DomainError> {
        let existing = SupplierEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Supplier"))?;

        let mut active: ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(now_rfc3339());
        active.update(&self.db).await?;
        Ok(())
    }
}
