use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::SupplierInput;

#[derive(Debug, Deserialize)]
pub struct ListSuppliersQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(params): Query<ListSuppliersQuery>,
) -> ApiResult {
    let suppliers = state.supplier_repo.find_all(!params.include_inactive).await?;
    ok("Suppliers retrieved", suppliers)
}

pub async fn get_supplier(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let supplier = state
        .supplier_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Supplier"))?;
    ok("Supplier retrieved", supplier)
}

pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<SupplierInput>,
) -> ApiResult {
    payload.validate()?;
    let supplier = state.supplier_repo.create(payload).await?;
    created("Supplier created successfully", supplier)
}

pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SupplierInput>,
) -> ApiResult {
    payload.validate()?;
    let supplier = state.supplier_repo.update(id, payload).await?;
    ok("Supplier updated successfully", supplier)
}

pub async fn delete_supplier(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    state.supplier_repo.deactivate(id).await?;
    ok("Supplier deactivated", ())
}
