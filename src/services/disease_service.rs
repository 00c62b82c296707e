//! Disease Service - disease catalogue and doctor assignments

use sea_orm::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::models::disease::{self, DiseaseInput, Entity as Disease};
use crate::models::doctor::{self, Entity as Doctor};
use crate::models::doctor_disease::{self, Entity as DoctorDisease};
use crate::utils::dates::now_rfc3339;

/// Flat read model: one row per doctor/disease pair
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DoctorDiseaseRow {
    pub doctor_id: i32,
    pub doctor_name: String,
    pub disease_id: i32,
    pub disease_name: String,
    pub description: Option<String>,
}

pub async fn list_diseases(db: &DatabaseConnection) -> Result<Vec<disease::Model>, DomainError> {
    Ok(Disease::find()
        .order_by_asc(disease::Column::Name)
        .all(db)
        .await?)
}

pub async fn create_disease(
    db: &DatabaseConnection,
    input: DiseaseInput,
) -> Result<disease::Model, DomainError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::validation("Disease name is required"));
    }
    let taken = Disease::find()
        .filter(disease::Column::Name.eq(name.clone()))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(DomainError::conflict(format!(
            "Disease '{}' already exists",
            name
        )));
    }

    Ok(disease::ActiveModel {
        name: Set(name),
        description: Set(input.description),
        created_at: Set(now_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// Link a disease to a doctor. Linking twice is a no-op.
pub async fn assign_disease(
    db: &DatabaseConnection,
    doctor_id: i32,
    disease_id: i32,
) -> Result<(), DomainError> {
    Doctor::find_by_id(doctor_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Doctor"))?;
    Disease::find_by_id(disease_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Disease"))?;

    if DoctorDisease::find_by_id((doctor_id, disease_id))
        .one(db)
        .await?
        .is_some()
    {
        return Ok(());
    }

    DoctorDisease::insert(doctor_disease::ActiveModel {
        doctor_id: Set(doctor_id),
        disease_id: Set(disease_id),
    })
    .exec_without_returning(db)
    .await?;

    Ok(())
}

pub async fn unassign_disease(
    db: &DatabaseConnection,
    doctor_id: i32,
    disease_id: i32,
) -> Result<(), DomainError> {
    let result = DoctorDisease::delete_by_id((doctor_id, disease_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(DomainError::not_found("Doctor disease assignment"));
    }
    Ok(())
}

/// Every doctor/disease pair, optionally for one doctor, ordered by doctor
/// then disease name.
pub async fn get_all_doctor_diseases(
    db: &DatabaseConnection,
    doctor_id: Option<i32>,
) -> Result<Vec<DoctorDiseaseRow>, DomainError> {
    let mut query = DoctorDisease::find();
    if let Some(doctor_id) = doctor_id {
        query = query.filter(doctor_disease::Column::DoctorId.eq(doctor_id));
    }
    let links = query.all(db).await?;
    if links.is_empty() {
        return Ok(Vec::new());
    }

    let doctor_ids: Vec<i32> = links.iter().map(|l| l.doctor_id).collect();
    let disease_ids: Vec<i32> = links.iter().map(|l| l.disease_id).collect();

    let doctors: HashMap<i32, doctor::Model> = Doctor::find()
        .filter(doctor::Column::Id.is_in(doctor_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();
    let diseases: HashMap<i32, disease::Model> = Disease::find()
        .filter(disease::Column::Id.is_in(disease_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();

    let mut rows: Vec<DoctorDiseaseRow> = links
        .into_iter()
        .filter_map(|link| {
            let doctor = doctors.get(&link.doctor_id)?;
            let disease = diseases.get(&link.disease_id)?;
            Some(DoctorDiseaseRow {
                doctor_id: doctor.id,
                doctor_name: doctor.name.clone(),
                disease_id: disease.id,
                disease_name: disease.name.clone(),
                description: disease.description.clone(),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.doctor_name
            .cmp(&b.doctor_name)
            .then(a.doctor_id.cmp(&b.doctor_id))
            .then(a.disease_name.cmp(&b.disease_name))
    });

    Ok(rows)
}
