//! Product Service - pharmacy catalogue

use sea_orm::*;

use crate::domain::DomainError;
use crate::models::ProductInput;
use crate::models::product::{self, Entity as Product};
use crate::models::supplier::Entity as Supplier;
use crate::utils::dates::now_rfc3339;

/// Filter parameters for listing products
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub category: Option<String>,
    /// Matches name or SKU
    pub search: Option<String>,
    pub include_inactive: bool,
}

pub async fn list_products(
    db: &DatabaseConnection,
    filter: ProductFilter,
) -> Result<Vec<product::Model>, DomainError> {
    let mut condition = Condition::all();

    if !filter.include_inactive {
        condition = condition.add(product::Column::IsActive.eq(true));
    }
    if let Some(category) = filter.category {
        condition = condition.add(product::Column::Category.eq(category));
    }
    if let Some(term) = filter.search.filter(|s| !s.trim().is_empty()) {
        let term = term.trim().to_string();
        condition = condition.add(
            Condition::any()
                .add(product::Column::Name.contains(&term))
                .add(product::Column::Sku.contains(&term)),
        );
    }

    Ok(Product::find()
        .filter(condition)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await?)
}

pub async fn get_product(db: &DatabaseConnection, id: i32) -> Result<product::Model, DomainError> {
    Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Product"))
}

pub async fn create_product(
    db: &DatabaseConnection,
    input: ProductInput,
) -> Result<product::Model, DomainError> {
    input.validate()?;
    ensure_sku_free(db, &input.sku, None).await?;
    ensure_supplier(db, input.supplier_id).await?;

    let now = now_rfc3339();
    let new_product = product::ActiveModel {
        supplier_id: Set(input.supplier_id),
        name: Set(input.name.trim().to_string()),
        sku: Set(input.sku.trim().to_string()),
        category: Set(input.category),
        unit_price: Set(input.unit_price),
        cost_price: Set(input.cost_price),
        reorder_level: Set(input.reorder_level),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(new_product.insert(db).await?)
}

pub async fn update_product(
    db: &DatabaseConnection,
    id: i32,
    input: ProductInput,
) -> Result<product::Model, DomainError> {
    input.validate()?;
    let existing = get_product(db, id).await?;
    ensure_sku_free(db, &input.sku, Some(id)).await?;
    ensure_supplier(db, input.supplier_id).await?;

    let mut active: product::ActiveModel = existing.into();
    active.supplier_id = Set(input.supplier_id);
    active.name = Set(input.name.trim().to_string());
    active.sku = Set(input.sku.trim().to_string());
    active.category = Set(input.category);
    active.unit_price = Set(input.unit_price);
    active.cost_price = Set(input.cost_price);
    active.reorder_level = Set(input.reorder_level);
    active.updated_at = Set(now_rfc3339());

    Ok(active.update(db).await?)
}

/// Soft delete: stock and sale history keep pointing at the row
pub async fn deactivate_product(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let existing = get_product(db, id).await?;

    let mut active: product::ActiveModel = existing.into();
    active.is_active = Set(false);
    active.updated_at = Set(now_rfc3339());
    active.update(db).await?;
    Ok(())
}

async fn ensure_sku_free(
    db: &DatabaseConnection,
    sku: &str,
    except: Option<i32>,
) -> Result<(), DomainError> {
    let mut query = Product::find().filter(product::Column::Sku.eq(sku.trim()));
    if let Some(id) = except {
        query = query.filter(product::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(DomainError::conflict(format!(
            "SKU '{}' is already in use",
            sku.trim()
        )));
    }
    Ok(())
}

async fn ensure_supplier(db: &DatabaseConnection, supplier_id: Option<i32>) -> Result<(), DomainError> {
    if let Some(id) = supplier_id {
        Supplier::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found("Supplier"))?;
    }
    Ok(())
}
