//! SeaORM implementation of PatientRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::{DomainError, PatientRepository};
use crate::models::PatientInput;
use crate::models::appointment::{self, Entity as AppointmentEntity};
use crate::models::branch::Entity as BranchEntity;
use crate::models::patient::{ActiveModel, Column, Entity as PatientEntity, Model};
use crate::utils::dates::now_rfc3339;

/// SeaORM-based implementation of PatientRepository
pub struct SeaOrmPatientRepository {
    db: DatabaseConnection,
}

impl SeaOrmPatientRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_branch(&self, branch_id: Option<i32>) -> Result<(), DomainError> {
        if let Some(branch_id) = branch_id {
            BranchEntity::find_by_id(branch_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| DomainError::not_found("Branch"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl PatientRepository for SeaOrmPatientRepository {
    async fn find_all(&self, search: Option<String>) -> Result<Vec<Model>, DomainError> {
        let mut query = PatientEntity::find();

        if let Some(term) = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(Column::Name.contains(&term))
                    .add(Column::Phone.contains(&term)),
            );
        }

        Ok(query.order_by_asc(Column::Name).all(&self.db).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Model>, DomainError> {
        Ok(PatientEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, input: PatientInput) -> Result<Model, DomainError> {
        self.ensure_branch(input.branch_id).await?;
        let now = now_rfc3339();

        let patient = ActiveModel {
            branch_id: Set(input.branch_id),
            name: Set(input.name.trim().to_string()),
            date_of_birth: Set(input.date_of_birth),
            gender: Set(input.gender),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(patient.insert(&self.db).await?)
    }

    async fn update(&self, id: i32, input: PatientInput) -> Result<Model, DomainError> {
        let existing = PatientEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Patient"))?;
        if existing.branch_id != input.branch_id {
            self.ensure_branch(input.branch_id).await?;
        }

        let mut active: ActiveModel = existing.into();
        active.branch_id = Set(input.branch_id);
        active.name = Set(input.name.trim().to_string());
        active.date_of_birth = Set(input.date_of_birth);
        active.gender = Set(input.gender);
        active.phone = Set(input.phone);
        active.email = Set(input.email);
        active.address = Set(input.address);
        active.updated_at = Set(now_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let appointments = AppointmentEntity::find()
            .filter(appointment::Column::PatientId.eq(id))
            .count(&self.db)
            .await?;
        if appointments > 0 {
            return Err(DomainError::invalid_state(
                "Patient has appointments and cannot be deleted",
            ));
        }

        let result = PatientEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Patient"));
        }

        Ok(())
    }
}
