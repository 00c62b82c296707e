use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "doctor_diseases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub doctor_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub disease_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::doctor::Entity",
        from = "Column::DoctorId",
        to = "super::doctor::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Doctor,
    #[sea_orm(
        belongs_to = "super::disease::Entity",
        from = "Column::DiseaseId",
        to = "super::disease::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Disease,
}

impl Related<super::doctor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Doctor.def()
    }
}

impl Related<super::disease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disease.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
