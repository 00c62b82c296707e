//! Sale Service - pharmacy point of sale
//!
//! A checkout writes the sale, its lines and the stock decrements in one
//! transaction. Voiding restores the stock the same way.

use chrono::Utc;
use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::models::branch::Entity as Branch;
use crate::models::patient::Entity as Patient;
use crate::models::product::{self, Entity as Product};
use crate::models::sale::{self, Entity as Sale};
use crate::models::sale_item::{self, Entity as SaleItem};
use crate::services::stock_service::{self, StockReason};
use crate::utils::dates::{self, now_rfc3339};
use crate::utils::money::round_cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Insurance,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Insurance => "insurance",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaleItemInput {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaleInput {
    pub branch_id: i32,
    pub patient_id: Option<i32>,
    pub customer_name: Option<String>,
    pub items: Vec<SaleItemInput>,
    #[serde(default)]
    pub discount: f64,
    pub paid_amount: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Sale line with the product name joined
#[derive(Debug, Clone, Serialize)]
pub struct SaleLine {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: sale::Model,
    pub items: Vec<SaleLine>,
}

/// Filter parameters for listing sales
#[derive(Debug, Default, Clone)]
pub struct SaleFilter {
    pub branch_id: Option<i32>,
    pub status: Option<String>,
    /// Inclusive `YYYY-MM-DD`
    pub from: Option<String>,
    /// Inclusive `YYYY-MM-DD`
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub completed_sales: u64,
    pub voided_sales: u64,
    pub revenue: f64,
    pub average_ticket: f64,
}

struct PricedLine {
    product: product::Model,
    quantity: i32,
    line_total: f64,
}

fn new_invoice_no() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "INV-{}-{}",
        Utc::now().format("%Y%m%d"),
        suffix[..8].to_uppercase()
    )
}

/// Record a checkout
pub async fn create_sale(
    db: &DatabaseConnection,
    input: SaleInput,
) -> Result<SaleWithItems, DomainError> {
    if input.items.is_empty() {
        return Err(DomainError::validation("A sale needs at least one item"));
    }
    if input.items.iter().any(|i| i.quantity <= 0) {
        return Err(DomainError::validation("Item quantities must be positive"));
    }
    if input.discount < 0.0 {
        return Err(DomainError::validation("Discount cannot be negative"));
    }

    let txn = db.begin().await?;

    Branch::find_by_id(input.branch_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Branch"))?;
    if let Some(patient_id) = input.patient_id {
        Patient::find_by_id(patient_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Patient"))?;
    }

    let mut lines = Vec::with_capacity(input.items.len());
    for item in &input.items {
        let product = Product::find_by_id(item.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Product"))?;
        if !product.is_active {
            return Err(DomainError::validation(format!(
                "{} is no longer sold",
                product.name
            )));
        }
        let line_total = round_cents(product.unit_price * item.quantity as f64);
        lines.push(PricedLine {
            product,
            quantity: item.quantity,
            line_total,
        });
    }

    let subtotal = round_cents(lines.iter().map(|l| l.line_total).sum());
    let discount = round_cents(input.discount);
    if discount > subtotal {
        return Err(DomainError::validation("Discount exceeds the subtotal"));
    }
    let total = round_cents(subtotal - discount);
    let paid_amount = round_cents(input.paid_amount);
    if paid_amount < total {
        return Err(DomainError::validation(format!(
            "Paid amount {:.2} is less than the total {:.2}",
            paid_amount, total
        )));
    }

    let now = now_rfc3339();
    let invoice_no = new_invoice_no();
    let saved_sale = sale::ActiveModel {
        branch_id: Set(input.branch_id),
        invoice_no: Set(invoice_no.clone()),
        patient_id: Set(input.patient_id),
        customer_name: Set(input.customer_name),
        subtotal: Set(subtotal),
        discount: Set(discount),
        total: Set(total),
        paid_amount: Set(paid_amount),
        change_amount: Set(round_cents(paid_amount - total)),
        payment_method: Set(input.payment_method.as_str().to_string()),
        status: Set("completed".to_owned()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let saved_item = sale_item::ActiveModel {
            sale_id: Set(saved_sale.id),
            product_id: Set(line.product.id),
            quantity: Set(line.quantity),
            unit_price: Set(line.product.unit_price),
            line_total: Set(line.line_total),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        stock_service::adjust_stock(
            &txn,
            line.product.id,
            input.branch_id,
            -line.quantity,
            StockReason::Sale,
            Some(invoice_no.clone()),
        )
        .await?;

        items.push(SaleLine {
            id: saved_item.id,
            product_id: saved_item.product_id,
            product_name: line.product.name,
            quantity: saved_item.quantity,
            unit_price: saved_item.unit_price,
            line_total: saved_item.line_total,
        });
    }

    txn.commit().await?;
    tracing::info!("Sale {} recorded, total {:.2}", saved_sale.invoice_no, total);

    Ok(SaleWithItems {
        sale: saved_sale,
        items,
    })
}

/// Void a completed sale and put its stock back
pub async fn void_sale(db: &DatabaseConnection, id: i32) -> Result<SaleWithItems, DomainError> {
    let txn = db.begin().await?;

    let existing = Sale::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Sale"))?;
    if existing.status == "voided" {
        return Err(DomainError::invalid_state("Sale is already voided"));
    }

    let mut active: sale::ActiveModel = existing.into();
    active.status = Set("voided".to_owned());
    active.updated_at = Set(now_rfc3339());
    let voided = active.update(&txn).await?;

    let sale_items = SaleItem::find()
        .filter(sale_item::Column::SaleId.eq(voided.id))
        .all(&txn)
        .await?;
    for item in &sale_items {
        stock_service::adjust_stock(
            &txn,
            item.product_id,
            voided.branch_id,
            item.quantity,
            StockReason::Return,
            Some(voided.invoice_no.clone()),
        )
        .await?;
    }

    let items = with_product_names(&txn, sale_items).await?;
    txn.commit().await?;
    tracing::info!("Sale {} voided", voided.invoice_no);

    Ok(SaleWithItems {
        sale: voided,
        items,
    })
}

pub async fn get_sale(db: &DatabaseConnection, id: i32) -> Result<SaleWithItems, DomainError> {
    let found = Sale::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Sale"))?;

    let sale_items = SaleItem::find()
        .filter(sale_item::Column::SaleId.eq(found.id))
        .order_by_asc(sale_item::Column::Id)
        .all(db)
        .await?;

    Ok(SaleWithItems {
        sale: found,
        items: with_product_names(db, sale_items).await?,
    })
}

pub async fn list_sales(
    db: &DatabaseConnection,
    filter: SaleFilter,
) -> Result<Vec<sale::Model>, DomainError> {
    let mut condition = Condition::all();

    if let Some(branch_id) = filter.branch_id {
        condition = condition.add(sale::Column::BranchId.eq(branch_id));
    }
    if let Some(status) = filter.status {
        condition = condition.add(sale::Column::Status.eq(status));
    }
    if let Some(from) = filter.from {
        let from = dates::parse_date(&from, "from")?;
        condition = condition.add(sale::Column::CreatedAt.gte(from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = filter.to {
        let to = dates::parse_date(&to, "to")?;
        let next = to.succ_opt().unwrap_or(to);
        condition = condition.add(sale::Column::CreatedAt.lt(next.format("%Y-%m-%d").to_string()));
    }

    Ok(Sale::find()
        .filter(condition)
        .order_by_desc(sale::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn sales_summary(
    db: &DatabaseConnection,
    branch_id: Option<i32>,
) -> Result<SalesSummary, DomainError> {
    let mut query = Sale::find();
    if let Some(branch_id) = branch_id {
        query = query.filter(sale::Column::BranchId.eq(branch_id));
    }
    let sales = query.all(db).await?;

    let completed: Vec<&sale::Model> = sales.iter().filter(|s| s.status == "completed").collect();
    let revenue = round_cents(completed.iter().map(|s| s.total).sum());
    let completed_sales = completed.len() as u64;

    Ok(SalesSummary {
        completed_sales,
        voided_sales: sales.len() as u64 - completed_sales,
        revenue,
        average_ticket: if completed_sales == 0 {
            0.0
        } else {
            round_cents(revenue / completed_sales as f64)
        },
    })
}

async fn with_product_names<C: ConnectionTrait>(
    conn: &C,
    items: Vec<sale_item::Model>,
) -> Result<Vec<SaleLine>, DomainError> {
    let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
    let mut names: HashMap<i32, String> = HashMap::new();

    if !product_ids.is_empty() {
        for p in Product::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(conn)
            .await?
        {
            names.insert(p.id, p.name);
        }
    }

    Ok(items
        .into_iter()
        .map(|item| SaleLine {
            id: item.id,
            product_id: item.product_id,
            product_name: names
                .get(&item.product_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total,
        })
        .collect())
}
