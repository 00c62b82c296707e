use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leaves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub staff_id: i32,
    pub leave_type: String, // 'casual', 'sick', 'annual', 'no_pay'
    pub start_date: String,
    pub end_date: String,
    pub days: i32,
    pub reason: Option<String>,
    pub status: String, // 'pending', 'approved', 'rejected', 'cancelled'
    pub manager_comment: Option<String>,
    pub admin_comment: Option<String>,
    pub decided_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Staff,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Casual,
    Sick,
    Annual,
    NoPay,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Casual => "casual",
            LeaveType::Sick => "sick",
            LeaveType::Annual => "annual",
            LeaveType::NoPay => "no_pay",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaveDto {
    pub staff_id: i32,
    pub leave_type: LeaveType,
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
}
