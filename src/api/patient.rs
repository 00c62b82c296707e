use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::PatientInput;
use crate::utils::dates;

#[derive(Debug, Deserialize)]
pub struct ListPatientsQuery {
    /// Name or phone fragment
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/patients",
    params(("q" = Option<String>, Query, description = "Name or phone fragment")),
    responses((status = 200, description = "Matching patients"))
)]
pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<ListPatientsQuery>,
) -> ApiResult {
    let patients = state.patient_repo.find_all(params.q).await?;
    ok("Patients retrieved", patients)
}

pub async fn get_patient(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let patient = state
        .patient_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Patient"))?;
    ok("Patient retrieved", patient)
}

pub async fn create_patient(
    State(state): State<AppState>,
    Json(payload): Json<PatientInput>,
) -> ApiResult {
    payload.validate(dates::today())?;
    let patient = state.patient_repo.create(payload).await?;
    created("Patient registered successfully", patient)
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PatientInput>,
) -> ApiResult {
    payload.validate(dates::today())?;
    let patient = state.patient_repo.update(id, payload).await?;
    ok("Patient updated successfully", patient)
}

pub async fn delete_patient(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    state.patient_repo.delete(id).await?;
    ok("Patient deleted", ())
}
