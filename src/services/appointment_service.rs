//! Appointment Service - booking and status changes

use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::models::appointment::{self, AppointmentDto, Entity as Appointment};
use crate::models::doctor::{self, Entity as Doctor};
use crate::models::patient::{self, Entity as Patient};
use crate::services::notification_service::{self, NewNotification, RecipientType};
use crate::utils::dates::{self, now_rfc3339};

/// Statuses that hold a doctor's slot
pub const ACTIVE_STATUSES: [&str; 2] = ["pending", "approved"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentAction {
    Approve,
    Reject,
    Cancel,
    Complete,
}

/// Status reached by applying `action` to an appointment in `current`.
pub fn next_status(current: &str, action: AppointmentAction) -> Result<&'static str, DomainError> {
    use AppointmentAction::*;

    match (current, action) {
        ("pending", Approve) => Ok("approved"),
        ("pending", Reject) => Ok("rejected"),
        ("pending", Cancel) | ("approved", Cancel) => Ok("cancelled"),
        ("approved", Complete) => Ok("completed"),
        _ => Err(DomainError::invalid_state(format!(
            "Cannot {:?} an appointment that is {}",
            action, current
        )
        .to_lowercase())),
    }
}

/// Appointment with doctor and patient names joined
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentWithDetails {
    #[serde(flatten)]
    pub appointment: appointment::Model,
    pub doctor_name: String,
    pub patient_name: String,
}

/// Filter parameters for listing appointments
#[derive(Debug, Default, Clone)]
pub struct AppointmentFilter {
    pub doctor_id: Option<i32>,
    pub patient_id: Option<i32>,
    pub date: Option<String>,
    pub status: Option<String>,
}

/// Book a new appointment in `pending` state and notify the doctor
pub async fn book_appointment(
    db: &DatabaseConnection,
    dto: AppointmentDto,
) -> Result<appointment::Model, DomainError> {
    let date = dates::parse_date(&dto.appointment_date, "appointment_date")?;
    let time = dates::parse_time(&dto.appointment_time, "appointment_time")?;
    if date < dates::today() {
        return Err(DomainError::validation(
            "Appointments cannot be booked in the past",
        ));
    }
    let date = date.format(dates::DATE_FORMAT).to_string();
    let time = time.format(dates::TIME_FORMAT).to_string();

    let txn = db.begin().await?;

    let doctor = Doctor::find_by_id(dto.doctor_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Doctor"))?;
    if !doctor.is_active {
        return Err(DomainError::invalid_state(
            "Doctor is not accepting appointments",
        ));
    }
    let patient = Patient::find_by_id(dto.patient_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Patient"))?;

    let taken = Appointment::find()
        .filter(appointment::Column::DoctorId.eq(doctor.id))
        .filter(appointment::Column::AppointmentDate.eq(date.clone()))
        .filter(appointment::Column::AppointmentTime.eq(time.clone()))
        .filter(appointment::Column::Status.is_in(ACTIVE_STATUSES))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(DomainError::conflict(format!(
            "{} already has an appointment on {} at {}",
            doctor.name, date, time
        )));
    }

    let now = now_rfc3339();
    let saved = appointment::ActiveModel {
        branch_id: Set(doctor.branch_id),
        doctor_id: Set(doctor.id),
        patient_id: Set(patient.id),
        appointment_date: Set(date.clone()),
        appointment_time: Set(time.clone()),
        reason: Set(dto.reason),
        status: Set("pending".to_owned()),
        comment: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    notification_service::notify(
        &txn,
        NewNotification::to(RecipientType::Doctor, Some(doctor.id), "appointment_requested").titled(
            "New appointment request",
            format!("{} requested {} at {}", patient.name, date, time),
        ),
    )
    .await?;

    txn.commit().await?;
    Ok(saved)
}

/// Apply an action on an existing connection, notifying the patient.
pub async fn transition<C: ConnectionTrait>(
    conn: &C,
    existing: appointment::Model,
    action: AppointmentAction,
    comment: Option<String>,
) -> Result<appointment::Model, DomainError> {
    let status = next_status(&existing.status, action)?;
    let patient_id = existing.patient_id;

    let mut active: appointment::ActiveModel = existing.into();
    active.status = Set(status.to_owned());
    if comment.is_some() {
        active.comment = Set(comment);
    }
    active.updated_at = Set(now_rfc3339());
    let updated = active.update(conn).await?;

    notification_service::notify(
        conn,
        NewNotification::to(RecipientType::Patient, Some(patient_id), "appointment_status").titled(
            format!("Appointment {}", status),
            format!(
                "Your appointment on {} at {} is now {}",
                updated.appointment_date, updated.appointment_time, status
            ),
        ),
    )
    .await?;

    Ok(updated)
}

pub async fn update_appointment_status(
    db: &DatabaseConnection,
    id: i32,
    action: AppointmentAction,
    comment: Option<String>,
) -> Result<appointment::Model, DomainError> {
    let txn = db.begin().await?;

    let existing = Appointment::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Appointment"))?;
    let updated = transition(&txn, existing, action, comment).await?;

    txn.commit().await?;
    Ok(updated)
}

pub async fn get_appointment(
    db: &DatabaseConnection,
    id: i32,
) -> Result<AppointmentWithDetails, DomainError> {
    let found = Appointment::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Appointment"))?;

    let mut details = with_names(db, vec![found]).await?;
    details
        .pop()
        .ok_or_else(|| DomainError::Internal("appointment vanished".to_string()))
}

pub async fn list_appointments(
    db: &DatabaseConnection,
    filter: AppointmentFilter,
) -> Result<Vec<AppointmentWithDetails>, DomainError> {
    let mut condition = Condition::all();

    if let Some(doctor_id) = filter.doctor_id {
        condition = condition.add(appointment::Column::DoctorId.eq(doctor_id));
    }
    if let Some(patient_id) = filter.patient_id {
        condition = condition.add(appointment::Column::PatientId.eq(patient_id));
    }
    if let Some(date) = filter.date {
        condition = condition.add(appointment::Column::AppointmentDate.eq(date));
    }
    if let Some(status) = filter.status {
        condition = condition.add(appointment::Column::Status.eq(status));
    }

    let appointments = Appointment::find()
        .filter(condition)
        .order_by_asc(appointment::Column::AppointmentDate)
        .order_by_asc(appointment::Column::AppointmentTime)
        .all(db)
        .await?;

    with_names(db, appointments).await
}

async fn with_names(
    db: &DatabaseConnection,
    appointments: Vec<appointment::Model>,
) -> Result<Vec<AppointmentWithDetails>, DomainError> {
    let doctor_ids: Vec<i32> = appointments.iter().map(|a| a.doctor_id).collect();
    let patient_ids: Vec<i32> = appointments.iter().map(|a| a.patient_id).collect();

    let mut doctor_names: HashMap<i32, String> = HashMap::new();
    let mut patient_names: HashMap<i32, String> = HashMap::new();

    if !appointments.is_empty() {
        for d in Doctor::find()
            .filter(doctor::Column::Id.is_in(doctor_ids))
            .all(db)
            .await?
        {
            doctor_names.insert(d.id, d.name);
        }
        for p in Patient::find()
            .filter(patient::Column::Id.is_in(patient_ids))
            .all(db)
            .await?
        {
            patient_names.insert(p.id, p.name);
        }
    }

    Ok(appointments
        .into_iter()
        .map(|appointment| {
            let doctor_name = doctor_names
                .get(&appointment.doctor_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string());
            let patient_name = patient_names
                .get(&appointment.patient_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string());
            AppointmentWithDetails {
                appointment,
                doctor_name,
                patient_name,
            }
        })
        .collect())
}
