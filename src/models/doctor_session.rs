use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "doctor_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub appointment_id: i32,
    pub doctor_id: i32,
    pub patient_id: i32,
    pub disease_id: i32,
    pub status: String, // 'open', 'closed'
    pub notes: Option<String>,
    pub started_at: String,
    pub closed_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::appointment::Entity",
        from = "Column::AppointmentId",
        to = "super::appointment::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Appointment,
    #[sea_orm(has_many = "super::session_answer::Entity")]
    SessionAnswer,
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointment.def()
    }
}

impl Related<super::session_answer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionAnswer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
