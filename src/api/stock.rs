//! Stock movement handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use super::response::{ApiResult, created, ok};
use crate::services::product_service;
use crate::services::stock_service::{self, StockReason};

#[derive(Debug, Deserialize)]
pub struct StockMovementRequest {
    pub product_id: i32,
    pub branch_id: i32,
    pub quantity: i32,
    pub reason: Option<StockReason>,
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub branch_id: Option<i32>,
    /// With `branch_id`, return only this product's quantity
    pub product_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct QuantityResponse {
    pub product_id: i32,
    pub branch_id: i32,
    pub quantity: i32,
}

/// GET /api/stock - stock levels, or a single quantity with product + branch
pub async fn list_stock(
    State(db): State<DatabaseConnection>,
    Query(params): Query<StockQuery>,
) -> ApiResult {
    if let (Some(product_id), Some(branch_id)) = (params.product_id, params.branch_id) {
        product_service::get_product(&db, product_id).await?;
        let quantity = stock_service::get_quantity(&db, product_id, branch_id).await?;
        return ok(
            "Stock retrieved",
            QuantityResponse {
                product_id,
                branch_id,
                quantity,
            },
        );
    }

    ok("Stock retrieved", stock_service::list_stock(&db, params.branch_id).await?)
}

/// POST /api/stock/in - receive goods
#[utoipa::path(
    post,
    path = "/api/stock/in",
    responses(
        (status = 201, description = "Stock added"),
        (status = 404, description = "Product or branch not found"),
        (status = 422, description = "Invalid quantity")
    )
)]
pub async fn stock_in(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<StockMovementRequest>,
) -> ApiResult {
    let movement = stock_service::stock_in(
        &db,
        payload.product_id,
        payload.branch_id,
        payload.quantity,
        payload.reason,
        payload.reference,
    )
    .await?;
    created("Stock updated", movement)
}

/// POST /api/stock/out - write off or adjust down
#[utoipa::path(
    post,
    path = "/api/stock/out",
    responses(
        (status = 201, description = "Stock removed"),
        (status = 422, description = "Insufficient stock")
    )
)]
pub async fn stock_out(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<StockMovementRequest>,
) -> ApiResult {
    let movement = stock_service::stock_out(
        &db,
        payload.product_id,
        payload.branch_id,
        payload.quantity,
        payload.reason,
        payload.reference,
    )
    .await?;
    created("Stock updated", movement)
}

pub async fn list_stock_events(
    State(db): State<DatabaseConnection>,
    Path(product_id): Path<i32>,
) -> ApiResult {
    product_service::get_product(&db, product_id).await?;
    ok("Stock events retrieved", stock_service::list_events(&db, product_id).await?)
}
