use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub branch_id: i32,
    pub name: String,
    pub designation: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub basic_salary: f64,
    pub ot_rate: f64, // per hour
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
    #[sea_orm(has_many = "super::leave::Entity")]
    Leave,
    #[sea_orm(has_many = "super::salary::Entity")]
    Salary,
}

impl Related<super::branch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branch.def()
    }
}

impl Related<super::leave::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leave.def()
    }
}

impl Related<super::salary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffInput {
    pub branch_id: i32,
    pub name: String,
    pub designation: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub basic_salary: f64,
    #[serde(default)]
    pub ot_rate: f64,
}

impl StaffInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Staff name is required"));
        }
        if self.basic_salary < 0.0 || self.ot_rate < 0.0 {
            return Err(DomainError::validation(
                "Salary and OT rate cannot be negative",
            ));
        }
        Ok(())
    }
}
