use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "main_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub disease_id: i32,
    pub question: String,
    pub sort_order: i32,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::disease::Entity",
        from = "Column::DiseaseId",
        to = "super::disease::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Disease,
    #[sea_orm(has_many = "super::sub_question::Entity")]
    SubQuestion,
}

impl Related<super::disease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disease.def()
    }
}

impl Related<super::sub_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubQuestion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
