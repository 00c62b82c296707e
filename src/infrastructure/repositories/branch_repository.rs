//! SeaORM implementation of BranchRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{BranchRepository, DomainError};
use crate::models::BranchInput;
use crate::models::branch::{ActiveModel, Column, Entity as BranchEntity, Model};
use crate::utils::dates::now_rfc3339;

/// SeaORM-based implementation of BranchRepository
pub struct SeaOrmBranchRepository {
    db: DatabaseConnection,
}

impl SeaOrmBranchRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> Result<(), DomainError> {
        let mut query = BranchEntity::find().filter(Column::Name.eq(name.trim()));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }
        if query.one(&self.db).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "A branch named '{}' already exists",
                name.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BranchRepository for SeaOrmBranchRepository {
    async fn find_all(&self, active_only: bool) -> Result<Vec<Model>, DomainError> {
        let mut query = BranchEntity::find();
        if active_only {
            query = query.filter(Column::IsActive.eq(true));
        }
        Ok(query.order_by_asc(Column::Name).all(&self.db).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Model>, DomainError> {
        Ok(BranchEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, input: BranchInput) -> Result<Model, DomainError> {
        self.ensure_name_free(&input.name, None).await?;
        let now = now_rfc3339();

        let branch = ActiveModel {
            name: Set(input.name.trim().to_string()),
            address: Set(input.address),
            phone: Set(input.phone),
            email: Set(input.email),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(branch.insert(&self.db).await?)
    }

    async fn update(&self, id: i32, input: BranchInput) -> Result<Model, DomainError> {
        let existing = BranchEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Branch"))?;
        self.ensure_name_free(&input.name, Some(id)).await?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.address = Set(input.address);
        active.phone = Set(input.phone);
        active.email = Set(input.email);
        active.updated_at = Set(now_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn deactivate(&self, id: i32) -> Result<(), DomainError> {
        let existing = BranchEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Branch"))?;

        let mut active: ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(now_rfc3339());
        active.update(&self.db).await?;
        Ok(())
    }
}
