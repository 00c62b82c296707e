//! Staff, overtime and salary handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::infrastructure::AppState;
use crate::models::StaffInput;
use crate::services::staff_service::{
    self, OvertimeAction, OvertimeFilter, OvertimeInput, SalaryFilter, SalaryRequest, StaffFilter,
};

#[derive(Debug, Deserialize)]
pub struct ListStaffQuery {
    pub branch_id: Option<i32>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListOvertimeQuery {
    pub staff_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OvertimeDecisionRequest {
    pub action: OvertimeAction,
}

#[derive(Debug, Deserialize)]
pub struct ListSalariesQuery {
    pub staff_id: Option<i32>,
    pub month: Option<String>,
    pub status: Option<String>,
}

pub async fn list_staff(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListStaffQuery>,
) -> ApiResult {
    let filter = StaffFilter {
        branch_id: params.branch_id,
        include_inactive: params.include_inactive,
    };
    ok("Staff retrieved", staff_service::list_staff(&db, filter).await?)
}

pub async fn get_staff(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    ok("Staff member retrieved", staff_service::get_staff(&db, id).await?)
}

pub async fn create_staff(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<StaffInput>,
) -> ApiResult {
    let member = staff_service::create_staff(&db, payload).await?;
    created("Staff member created successfully", member)
}

pub async fn update_staff(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<StaffInput>,
) -> ApiResult {
    let member = staff_service::update_staff(&db, id, payload).await?;
    ok("Staff member updated successfully", member)
}

pub async fn delete_staff(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    staff_service::deactivate_staff(&db, id).await?;
    ok("Staff member deactivated", ())
}

// Overtime

pub async fn list_overtime(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListOvertimeQuery>,
) -> ApiResult {
    let filter = OvertimeFilter {
        staff_id: params.staff_id,
        status: params.status,
    };
    ok("Overtime retrieved", staff_service::list_overtime(&db, filter).await?)
}

pub async fn record_overtime(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<OvertimeInput>,
) -> ApiResult {
    let record = staff_service::record_overtime(&db, payload).await?;
    created("Overtime recorded", record)
}

pub async fn decide_overtime(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<OvertimeDecisionRequest>,
) -> ApiResult {
    let record = staff_service::decide_overtime(&db, id, payload.action).await?;
    ok("Overtime decision saved", record)
}

// Salaries

pub async fn list_salaries(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListSalariesQuery>,
) -> ApiResult {
    let filter = SalaryFilter {
        staff_id: params.staff_id,
        month: params.month,
        status: params.status,
    };
    ok("Salaries retrieved", staff_service::list_salaries(&db, filter).await?)
}

/// POST /api/salaries - generate (or regenerate) a monthly salary
#[utoipa::path(
    post,
    path = "/api/salaries",
    responses(
        (status = 201, description = "Salary generated"),
        (status = 409, description = "Salary for the month already paid")
    )
)]
pub async fn generate_salary(
    State(state): State<AppState>,
    Json(payload): Json<SalaryRequest>,
) -> ApiResult {
    let salary =
        staff_service::generate_salary(state.db(), payload, state.working_days_per_month).await?;
    created("Salary generated", salary)
}

pub async fn pay_salary(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    ok("Salary paid", staff_service::pay_salary(&db, id).await?)
}
