use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::models::ProductInput;
use crate::services::product_service::{self, ProductFilter};
use crate::services::stock_service;

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct BranchQuery {
    pub branch_id: Option<i32>,
}

pub async fn list_products(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListProductsQuery>,
) -> ApiResult {
    let filter = ProductFilter {
        category: params.category,
        search: params.q,
        include_inactive: params.include_inactive,
    };
    ok("Products retrieved", product_service::list_products(&db, filter).await?)
}

pub async fn get_product(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    ok("Product retrieved", product_service::get_product(&db, id).await?)
}

pub async fn create_product(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<ProductInput>,
) -> ApiResult {
    let product = product_service::create_product(&db, payload).await?;
    created("Product created successfully", product)
}

pub async fn update_product(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductInput>,
) -> ApiResult {
    let product = product_service::update_product(&db, id, payload).await?;
    ok("Product updated successfully", product)
}

pub async fn delete_product(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    product_service::deactivate_product(&db, id).await?;
    ok("Product deactivated", ())
}

/// GET /api/products/low-stock - stock rows at or under their reorder level
#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    params(("branch_id" = Option<i32>, Query, description = "Only this branch")),
    responses((status = 200, description = "Products needing reorder"))
)]
pub async fn low_stock(
    State(db): State<DatabaseConnection>,
    Query(params): Query<BranchQuery>,
) -> ApiResult {
    ok(
        "Low stock products retrieved",
        stock_service::low_stock(&db, params.branch_id).await?,
    )
}
