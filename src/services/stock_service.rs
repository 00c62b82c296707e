//! Stock Service - ProductStockManagement
//!
//! Every movement goes through [`adjust_stock`]: update the per-branch
//! counter, write one `stock_events` audit row, and raise a `low_stock`
//! admin notification when the counter drops to the product's reorder level.

use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::models::branch::Entity as Branch;
use crate::models::product::{self, Entity as Product};
use crate::models::product_stock::{self, Entity as ProductStock};
use crate::models::stock_event::{self, Entity as StockEvent};
use crate::services::notification_service::{self, NewNotification, RecipientType};
use crate::utils::dates::now_rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockReason {
    Purchase,
    Sale,
    Adjustment,
    Return,
    Expired,
}

impl StockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockReason::Purchase => "purchase",
            StockReason::Sale => "sale",
            StockReason::Adjustment => "adjustment",
            StockReason::Return => "return",
            StockReason::Expired => "expired",
        }
    }
}

/// Outcome of a single stock movement
#[derive(Debug, Clone, Serialize)]
pub struct StockMovement {
    pub stock: product_stock::Model,
    pub event: stock_event::Model,
    pub low_stock_alert: bool,
}

/// Stock row with product details joined
#[derive(Debug, Clone, Serialize)]
pub struct StockLevel {
    pub product_id: i32,
    pub product_name: String,
    pub sku: String,
    pub branch_id: i32,
    pub quantity: i32,
    pub reorder_level: i32,
    pub below_reorder_level: bool,
}

/// A low stock alert fires when the counter crosses the reorder level
/// downwards, so repeated sales under the threshold do not repeat it.
pub fn crosses_reorder_level(previous: i32, current: i32, reorder_level: i32) -> bool {
    previous > reorder_level && current <= reorder_level
}

/// Apply `delta` to the stock of a product at a branch.
///
/// Generic over the connection so it runs inside a caller's transaction
/// (a point-of-sale checkout) or inside the one opened by
/// [`stock_in`]/[`stock_out`].
pub async fn adjust_stock<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
    branch_id: i32,
    delta: i32,
    reason: StockReason,
    reference: Option<String>,
) -> Result<StockMovement, DomainError> {
    if delta == 0 {
        return Err(DomainError::validation("Stock change cannot be zero"));
    }

    let product = Product::find_by_id(product_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Product"))?;

    let existing = ProductStock::find()
        .filter(product_stock::Column::ProductId.eq(product_id))
        .filter(product_stock::Column::BranchId.eq(branch_id))
        .one(conn)
        .await?;

    let previous = existing.as_ref().map(|s| s.quantity).unwrap_or(0);
    let current = previous
        .checked_add(delta)
        .ok_or_else(|| DomainError::validation("Stock quantity out of range"))?;
    if current < 0 {
        return Err(DomainError::validation(format!(
            "Insufficient stock for {}: {} available, {} requested",
            product.name, previous, -delta
        )));
    }

    let now = now_rfc3339();
    let stock = match existing {
        Some(row) => {
            let mut active: product_stock::ActiveModel = row.into();
            active.quantity = Set(current);
            active.updated_at = Set(now.clone());
            active.update(conn).await?
        }
        None => {
            Branch::find_by_id(branch_id)
                .one(conn)
                .await?
                .ok_or_else(|| DomainError::not_found("Branch"))?;

            product_stock::ActiveModel {
                product_id: Set(product_id),
                branch_id: Set(branch_id),
                quantity: Set(current),
                updated_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await?
        }
    };

    let event = stock_event::ActiveModel {
        product_id: Set(product_id),
        branch_id: Set(branch_id),
        change: Set(delta),
        quantity_after: Set(current),
        reason: Set(reason.as_str().to_string()),
        reference: Set(reference),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    let low_stock_alert = crosses_reorder_level(previous, current, product.reorder_level);
    if low_stock_alert {
        tracing::info!(
            "Product {} at branch {} reached reorder level ({} left)",
            product.sku,
            branch_id,
            current
        );
        notification_service::notify(
            conn,
            NewNotification::to(RecipientType::Admin, None, "low_stock").titled(
                format!("Low stock: {}", product.name),
                format!(
                    "{} ({}) has {} units left at branch {}, reorder level is {}",
                    product.name, product.sku, current, branch_id, product.reorder_level
                ),
            ),
        )
        .await?;
    }

    Ok(StockMovement {
        stock,
        event,
        low_stock_alert,
    })
}

/// Receive stock in its own transaction
pub async fn stock_in(
    db: &DatabaseConnection,
    product_id: i32,
    branch_id: i32,
    quantity: i32,
    reason: Option<StockReason>,
    reference: Option<String>,
) -> Result<StockMovement, DomainError> {
    if quantity <= 0 {
        return Err(DomainError::validation("Quantity must be positive"));
    }

    let txn = db.begin().await?;
    let movement = adjust_stock(
        &txn,
        product_id,
        branch_id,
        quantity,
        reason.unwrap_or(StockReason::Purchase),
        reference,
    )
    .await?;
    txn.commit().await?;

    Ok(movement)
}

/// Remove stock in its own transaction
pub async fn stock_out(
    db: &DatabaseConnection,
    product_id: i32,
    branch_id: i32,
    quantity: i32,
    reason: Option<StockReason>,
    reference: Option<String>,
) -> Result<StockMovement, DomainError> {
    if quantity <= 0 {
        return Err(DomainError::validation("Quantity must be positive"));
    }

    let txn = db.begin().await?;
    let movement = adjust_stock(
        &txn,
        product_id,
        branch_id,
        -quantity,
        reason.unwrap_or(StockReason::Adjustment),
        reference,
    )
    .await?;
    txn.commit().await?;

    Ok(movement)
}

/// Current quantity of a product at a branch, zero when never stocked
pub async fn get_quantity(
    db: &DatabaseConnection,
    product_id: i32,
    branch_id: i32,
) -> Result<i32, DomainError> {
    let row = ProductStock::find()
        .filter(product_stock::Column::ProductId.eq(product_id))
        .filter(product_stock::Column::BranchId.eq(branch_id))
        .one(db)
        .await?;
    Ok(row.map(|s| s.quantity).unwrap_or(0))
}

/// Stock levels with product details, optionally for a single branch
pub async fn list_stock(
    db: &DatabaseConnection,
    branch_id: Option<i32>,
) -> Result<Vec<StockLevel>, DomainError> {
    stock_levels(db, branch_id, false).await
}

/// Active products at or below their reorder level
pub async fn low_stock(
    db: &DatabaseConnection,
    branch_id: Option<i32>,
) -> Result<Vec<StockLevel>, DomainError> {
    let levels = stock_levels(db, branch_id, true).await?;
    Ok(levels.into_iter().filter(|l| l.below_reorder_level).collect())
}

async fn stock_levels(
    db: &DatabaseConnection,
    branch_id: Option<i32>,
    active_only: bool,
) -> Result<Vec<StockLevel>, DomainError> {
    let mut query = ProductStock::find().find_also_related(Product);
    if let Some(branch_id) = branch_id {
        query = query.filter(product_stock::Column::BranchId.eq(branch_id));
    }
    if active_only {
        query = query.filter(product::Column::IsActive.eq(true));
    }

    let rows = query
        .order_by_asc(product_stock::Column::BranchId)
        .order_by_asc(product_stock::Column::ProductId)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(stock, product)| product.map(|p| stock_level(stock, p)))
        .collect())
}

/// Audit trail of a product, newest first
pub async fn list_events(
    db: &DatabaseConnection,
    product_id: i32,
) -> Result<Vec<stock_event::Model>, DomainError> {
    Ok(StockEvent::find()
        .filter(stock_event::Column::ProductId.eq(product_id))
        .order_by_desc(stock_event::Column::Id)
        .all(db)
        .await?)
}

fn stock_level(stock: product_stock::Model, product: product::Model) -> StockLevel {
    StockLevel {
        product_id: product.id,
        product_name: product.name,
        sku: product.sku,
        branch_id: stock.branch_id,
        quantity: stock.quantity,
        reorder_level: product.reorder_level,
        below_reorder_level: stock.quantity <= product.reorder_level,
    }
}
