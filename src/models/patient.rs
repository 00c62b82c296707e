use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::utils::dates;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub branch_id: Option<i32>,
    pub name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branch::Entity",
        from = "Column::BranchId",
        to = "super::branch::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Branch,
    #[sea_orm(has_many = "super::appointment::Entity")]
    Appointment,
}

impl Related<super::branch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branch.def()
    }
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientInput {
    pub branch_id: Option<i32>,
    pub name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl PatientInput {
    pub fn validate(&self, today: NaiveDate) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Patient name is required"));
        }
        if let Some(dob) = &self.date_of_birth {
            let dob = dates::parse_date(dob, "date_of_birth")?;
            if dob > today {
                return Err(DomainError::validation(
                    "date_of_birth cannot be in the future",
                ));
            }
        }
        Ok(())
    }
}
