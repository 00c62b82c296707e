//! Leave handlers: apply, branch manager decision, admin decision, cancel

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::models::leave::LeaveDto;
use crate::services::leave_service::{self, LeaveAction, LeaveFilter};

#[derive(Debug, Deserialize)]
pub struct ListLeavesQuery {
    pub staff_id: Option<i32>,
    pub status: Option<String>,
}

/// Body of both decision endpoints
#[derive(Debug, Deserialize)]
pub struct LeaveDecisionRequest {
    pub action: LeaveAction,
    pub comment: Option<String>,
}

pub async fn list_leaves(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListLeavesQuery>,
) -> ApiResult {
    let filter = LeaveFilter {
        staff_id: params.staff_id,
        status: params.status,
    };
    ok("Leaves retrieved", leave_service::list_leaves(&db, filter).await?)
}

#[utoipa::path(
    post,
    path = "/api/leaves",
    responses(
        (status = 201, description = "Leave requested"),
        (status = 409, description = "Overlaps another leave"),
        (status = 422, description = "Invalid dates")
    )
)]
pub async fn apply_leave(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<LeaveDto>,
) -> ApiResult {
    let leave = leave_service::apply_leave(&db, payload).await?;
    created("Leave requested", leave)
}

/// PUT /api/leaves/:id/manage - branch manager decision
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/manage",
    params(("id" = i32, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Decision saved"),
        (status = 409, description = "Leave is no longer pending")
    )
)]
pub async fn manage_leave(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<LeaveDecisionRequest>,
) -> ApiResult {
    let leave = leave_service::manage_leave(&db, id, payload.action, payload.comment).await?;
    ok("Leave decision saved", leave)
}

/// PUT /api/leaves/:id/admin-manage - admin decision, may overturn
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/admin-manage",
    params(("id" = i32, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Decision saved"),
        (status = 409, description = "Leave was cancelled")
    )
)]
pub async fn admin_manage_leave(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<LeaveDecisionRequest>,
) -> ApiResult {
    let leave =
        leave_service::admin_manage_leave(&db, id, payload.action, payload.comment).await?;
    ok("Leave decision saved", leave)
}

pub async fn cancel_leave(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    ok("Leave cancelled", leave_service::cancel_leave(&db, id).await?)
}

pub async fn get_leave(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    ok("Leave retrieved", leave_service::get_leave(&db, id).await?)
}
