use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub session_id: i32,
    pub main_question_id: i32,
    pub sub_question_id: Option<i32>,
    pub answer: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::doctor_session::Entity",
        from = "Column::SessionId",
        to = "super::doctor_session::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    DoctorSession,
}

impl Related<super::doctor_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DoctorSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
