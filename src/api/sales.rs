use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::services::sale_service::{self, SaleFilter, SaleInput};

/// Query parameters for listing sales
#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    pub branch_id: Option<i32>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub branch_id: Option<i32>,
}

/// POST /api/sales - Record a point-of-sale transaction
#[utoipa::path(
    post,
    path = "/api/sales",
    responses(
        (status = 201, description = "Sale recorded, stock decremented"),
        (status = 404, description = "Product or branch not found"),
        (status = 422, description = "Insufficient stock or payment")
    )
)]
pub async fn create_sale(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<SaleInput>,
) -> ApiResult {
    let sale = sale_service::create_sale(&db, payload).await?;
    created("Sale recorded successfully", sale)
}

/// GET /api/sales - List sales with optional filters
pub async fn list_sales(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListSalesQuery>,
) -> ApiResult {
    let filter = SaleFilter {
        branch_id: params.branch_id,
        status: params.status,
        from: params.from,
        to: params.to,
    };
    ok("Sales retrieved", sale_service::list_sales(&db, filter).await?)
}

/// GET /api/sales/:id - Sale with its lines
pub async fn get_sale(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    ok("Sale retrieved", sale_service::get_sale(&db, id).await?)
}

/// PUT /api/sales/:id/void - Void a sale and put its stock back
#[utoipa::path(
    put,
    path = "/api/sales/{id}/void",
    params(("id" = i32, Path, description = "Sale ID")),
    responses(
        (status = 200, description = "Sale voided"),
        (status = 409, description = "Sale already voided")
    )
)]
pub async fn void_sale(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    ok("Sale voided", sale_service::void_sale(&db, id).await?)
}

/// GET /api/sales/summary - Revenue figures
pub async fn sales_summary(
    State(db): State<DatabaseConnection>,
    Query(params): Query<SummaryQuery>,
) -> ApiResult {
    ok(
        "Sales summary retrieved",
        sale_service::sales_summary(&db, params.branch_id).await?,
    )
}
