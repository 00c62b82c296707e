//! Branch API handlers using repository pattern

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::BranchInput;

#[derive(Debug, Deserialize)]
pub struct ListBranchesQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[utoipa::path(
    get,
    path = "/api/branches",
    responses((status = 200, description = "List of branches"))
)]
pub async fn list_branches(
    State(state): State<AppState>,
    Query(params): Query<ListBranchesQuery>,
) -> ApiResult {
    let branches = state.branch_repo.find_all(!params.include_inactive).await?;
    ok("Branches retrieved", branches)
}

pub async fn get_branch(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let branch = state
        .branch_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Branch"))?;
    ok("Branch retrieved", branch)
}

#[utoipa::path(
    post,
    path = "/api/branches",
    responses(
        (status = 201, description = "Branch created"),
        (status = 409, description = "Branch name already used")
    )
)]
pub async fn create_branch(
    State(state): State<AppState>,
    Json(payload): Json<BranchInput>,
) -> ApiResult {
    payload.validate()?;
    let branch = state.branch_repo.create(payload).await?;
    created("Branch created successfully", branch)
}

pub async fn update_branch(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BranchInput>,
) -> ApiResult {
    payload.validate()?;
    let branch = state.branch_repo.update(id, payload).await?;
    ok("Branch updated successfully", branch)
}

pub async fn delete_branch(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    state.branch_repo.deactivate(id).await?;
    ok("Branch deactivated", ())
}
