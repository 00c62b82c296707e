use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub branch_id: i32,
    pub name: String,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub consultation_fee: f64,
    pub is_active: bool,
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
        on_delete = "Cascade"
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
pub struct DoctorInput {
    pub branch_id: i32,
    pub name: String,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub consultation_fee: f64,
}

impl DoctorInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Doctor name is required"));
        }
        if self.consultation_fee < 0.0 {
            return Err(DomainError::validation(
                "Consultation fee cannot be negative",
            ));
        }
        Ok(())
    }
}
