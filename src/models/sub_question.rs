use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sub_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub main_question_id: i32,
    pub question: String,
    pub sort_order: i32,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::main_question::Entity",
        from = "Column::MainQuestionId",
        to = "super::main_question::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    MainQuestion,
}

impl Related<super::main_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MainQuestion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
