use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub supplier_id: Option<i32>,
    pub name: String,
    #[sea_orm(unique)]
    pub sku: String,
    pub category: Option<String>,
    pub unit_price: f64,
    pub cost_price: f64,
    pub reorder_level: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Supplier,
    #[sea_orm(has_many = "super::product_stock::Entity")]
    ProductStock,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::product_stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductStock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub supplier_id: Option<i32>,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub unit_price: f64,
    #[serde(default)]
    pub cost_price: f64,
    #[serde(default)]
    pub reorder_level: i32,
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Product name is required"));
        }
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("Product SKU is required"));
        }
        if self.unit_price < 0.0 || self.cost_price < 0.0 {
            return Err(DomainError::validation("Prices cannot be negative"));
        }
        if self.reorder_level < 0 {
            return Err(DomainError::validation("Reorder level cannot be negative"));
        }
        Ok(())
    }
}
