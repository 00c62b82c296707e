//! SeaORM implementation of DoctorRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{DoctorFilter, DoctorRepository, DomainError};
use crate::models::DoctorInput;
use crate::models::branch::Entity as BranchEntity;
use crate::models::doctor::{ActiveModel, Column, Entity as DoctorEntity, Model};
use crate::utils::dates::now_rfc3339;

/// SeaORM-based implementation of DoctorRepository
pub struct SeaOrmDoctorRepository {
    db: DatabaseConnection,
}

impl SeaOrmDoctorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_branch(&self, branch_id: i32) -> Result<(), DomainError> {
        BranchEntity::find_by_id(branch_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Branch"))?;
        Ok(())
    }
}

#[async_trait]
impl DoctorRepository for SeaOrmDoctorRepository {
    async fn find_all(&self, filter: DoctorFilter) -> Result<Vec<Model>, DomainError> {
        let mut query = DoctorEntity::find();

        if !filter.include_inactive {
            query = query.filter(Column::IsActive.eq(true));
        }
        if let Some(branch_id) = filter.branch_id {
            query = query.filter(Column::BranchId.eq(branch_id));
        }
        if let Some(specialization) = filter.specialization {
            query = query.filter(Column::Specialization.eq(specialization));
        }

        Ok(query.order_by_asc(Column::Name).all(&self.db).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Model>, DomainError> {
        Ok(DoctorEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, input: DoctorInput) -> Result<Model, DomainError> {
        self.ensure_branch(input.branch_id).await?;
        let now = now_rfc3339();

        let doctor = ActiveModel {
            branch_id: Set(input.branch_id),
            name: Set(input.name.trim().to_string()),
            specialization: Set(input.specialization),
            email: Set(input.email),
            phone: Set(input.phone),
            consultation_fee: Set(input.consultation_fee),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(doctor.insert(&self.db).await?)
    }

    async fn update(&self, id: i32, input: DoctorInput) -> Result<Model, DomainError> {
        let existing = DoctorEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Doctor"))?;
        if existing.branch_id != input.branch_id {
            self.ensure_branch(input.branch_id).await?;
        }

        let mut active: ActiveModel = existing.into();
        active.branch_id = Set(input.branch_id);
        active.name = Set(input.name.trim().to_string());
        active.specialization = Set(input.specialization);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.consultation_fee = Set(input.consultation_fee);
        active.updated_at = Set(now_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn deactivate(&self, id: i32) -> Result<(), DomainError> {
        let existing = DoctorEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Doctor"))?;

        let mut active: ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(now_rfc3339());
        active.update(&self.db).await?;
        Ok(())
    }
}
