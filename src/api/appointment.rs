use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::models::appointment::AppointmentDto;
use crate::services::appointment_service::{self, AppointmentAction, AppointmentFilter};

#[derive(Debug, Deserialize)]
pub struct ListAppointmentsQuery {
    pub doctor_id: Option<i32>,
    pub patient_id: Option<i32>,
    pub date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub action: AppointmentAction,
    pub comment: Option<String>,
}

/// POST /api/appointments - Book an appointment
#[utoipa::path(
    post,
    path = "/api/appointments",
    responses(
        (status = 201, description = "Appointment booked"),
        (status = 404, description = "Doctor or patient not found"),
        (status = 409, description = "Slot already taken")
    )
)]
pub async fn book_appointment(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<AppointmentDto>,
) -> ApiResult {
    let appointment = appointment_service::book_appointment(&db, payload).await?;
    created("Appointment booked successfully", appointment)
}

/// GET /api/appointments - List appointments with optional filters
pub async fn list_appointments(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListAppointmentsQuery>,
) -> ApiResult {
    let filter = AppointmentFilter {
        doctor_id: params.doctor_id,
        patient_id: params.patient_id,
        date: params.date,
        status: params.status,
    };
    let appointments = appointment_service::list_appointments(&db, filter).await?;
    ok("Appointments retrieved", appointments)
}

pub async fn get_appointment(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult {
    ok(
        "Appointment retrieved",
        appointment_service::get_appointment(&db, id).await?,
    )
}

/// PUT /api/appointments/:id/status - approve, reject, cancel or complete
#[utoipa::path(
    put,
    path = "/api/appointments/{id}/status",
    params(("id" = i32, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Status changed"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_appointment_status(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult {
    let appointment =
        appointment_service::update_appointment_status(&db, id, payload.action, payload.comment)
            .await?;
    ok("Appointment status updated", appointment)
}
