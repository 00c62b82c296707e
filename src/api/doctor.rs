//! Doctor and disease handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::domain::{DoctorFilter, DomainError};
use crate::infrastructure::AppState;
use crate::models::DoctorInput;
use crate::models::disease::DiseaseInput;
use crate::services::disease_service;

#[derive(Debug, Deserialize)]
pub struct ListDoctorsQuery {
    pub branch_id: Option<i32>,
    pub specialization: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[utoipa::path(
    get,
    path = "/api/doctors",
    responses((status = 200, description = "List of doctors"))
)]
pub async fn list_doctors(
    State(state): State<AppState>,
    Query(params): Query<ListDoctorsQuery>,
) -> ApiResult {
    let filter = DoctorFilter {
        branch_id: params.branch_id,
        specialization: params.specialization,
        include_inactive: params.include_inactive,
    };
    let doctors = state.doctor_repo.find_all(filter).await?;
    ok("Doctors retrieved", doctors)
}

pub async fn get_doctor(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let doctor = state
        .doctor_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Doctor"))?;
    ok("Doctor retrieved", doctor)
}

pub async fn create_doctor(
    State(state): State<AppState>,
    Json(payload): Json<DoctorInput>,
) -> ApiResult {
    payload.validate()?;
    let doctor = state.doctor_repo.create(payload).await?;
    created("Doctor created successfully", doctor)
}

pub async fn update_doctor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<DoctorInput>,
) -> ApiResult {
    payload.validate()?;
    let doctor = state.doctor_repo.update(id, payload).await?;
    ok("Doctor updated successfully", doctor)
}

pub async fn delete_doctor(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    state.doctor_repo.deactivate(id).await?;
    ok("Doctor deactivated", ())
}

// Diseases

pub async fn list_diseases(State(db): State<DatabaseConnection>) -> ApiResult {
    ok("Diseases retrieved", disease_service::list_diseases(&db).await?)
}

pub async fn create_disease(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<DiseaseInput>,
) -> ApiResult {
    let disease = disease_service::create_disease(&db, payload).await?;
    created("Disease created successfully", disease)
}

#[derive(Debug, Deserialize)]
pub struct DoctorDiseaseQuery {
    pub doctor_id: Option<i32>,
}

/// GET /api/doctor-diseases - flat doctor/disease rows
#[utoipa::path(
    get,
    path = "/api/doctor-diseases",
    params(("doctor_id" = Option<i32>, Query, description = "Only this doctor")),
    responses((status = 200, description = "Doctor and disease pairs"))
)]
pub async fn get_all_doctor_diseases(
    State(db): State<DatabaseConnection>,
    Query(params): Query<DoctorDiseaseQuery>,
) -> ApiResult {
    let rows = disease_service::get_all_doctor_diseases(&db, params.doctor_id).await?;
    ok("Doctor diseases retrieved", rows)
}

pub async fn assign_disease(
    State(db): State<DatabaseConnection>,
    Path((doctor_id, disease_id)): Path<(i32, i32)>,
) -> ApiResult {
    disease_service::assign_disease(&db, doctor_id, disease_id).await?;
    ok("Disease assigned to doctor", ())
}

pub async fn unassign_disease(
    State(db): State<DatabaseConnection>,
    Path((doctor_id, disease_id)): Path<(i32, i32)>,
) -> ApiResult {
    disease_service::unassign_disease(&db, doctor_id, disease_id).await?;
    ok("Disease removed from doctor", ())
}
