use sea_orm::*;

use crate::domain::DomainError;
use crate::models::disease::DiseaseInput;
use crate::models::{BranchInput, DoctorInput, ProductInput, StaffInput, SupplierInput, branch};
use crate::services::session_service::{MainQuestionInput, SubQuestionInput};
use crate::services::stock_service::StockReason;
use crate::services::{disease_service, product_service, session_service, staff_service, stock_service};
use crate::infrastructure::AppState;

/// Populate an empty database with one working branch. Does nothing when a
/// branch already exists.
pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    let db = state.db();
    if branch::Entity::find().count(db).await? > 0 {
        tracing::info!("Database already has branches, skipping demo seed");
        return Ok(());
    }

    // 1. Branch
    let main = state
        .branch_repo
        .create(BranchInput {
            name: "Central Hospital".to_owned(),
            address: Some("12 Lake Road".to_owned()),
            phone: Some("011 234 5678".to_owned()),
            email: Some("central@medidesk.local".to_owned()),
        })
        .await?;

    // 2. Doctors
    let doctors = [
        ("Dr. Amara Perera", "Cardiology", 2500.0),
        ("Dr. Nimal Silva", "General Practice", 1500.0),
    ];
    let mut doctor_ids = Vec::new();
    for (name, specialization, fee) in doctors {
        let doctor = state
            .doctor_repo
            .create(DoctorInput {
                branch_id: main.id,
                name: name.to_owned(),
                specialization: Some(specialization.to_owned()),
                email: None,
                phone: None,
                consultation_fee: fee,
            })
            .await?;
        doctor_ids.push(doctor.id);
    }

    // 3. Diseases with their questionnaires
    let hypertension = seed_disease(state, "Hypertension", &doctor_ids).await?;
    seed_question(
        state,
        hypertension,
        1,
        "Do you get frequent headaches?",
        &["Mostly in the morning?", "Do painkillers help?"],
    )
    .await?;
    seed_question(state, hypertension, 2, "Do you smoke?", &["How many per day?"]).await?;

    let diabetes = seed_disease(state, "Diabetes", &doctor_ids).await?;
    seed_question(state, diabetes, 1, "Do you feel thirsty often?", &[]).await?;
    seed_question(
        state,
        diabetes,
        2,
        "Is there a family history of diabetes?",
        &["Which parent?"],
    )
    .await?;

    // 4. Pharmacy
    let supplier = state
        .supplier_repo
        .create(SupplierInput {
            name: "Lanka Pharma Distributors".to_owned(),
            contact_person: Some("K. Fernando".to_owned()),
            phone: None,
            email: None,
            address: None,
        })
        .await?;

    let products = [
        ("Paracetamol 500mg", "PARA-500", "Analgesic", 5.0, 3.2, 50, 400),
        ("Amoxicillin 250mg", "AMOX-250", "Antibiotic", 18.5, 12.0, 30, 120),
        ("Metformin 500mg", "METF-500", "Antidiabetic", 9.75, 6.1, 40, 45),
    ];
    for (name, sku, category, price, cost, reorder, opening) in products {
        let product = product_service::create_product(
            db,
            ProductInput {
                supplier_id: Some(supplier.id),
                name: name.to_owned(),
                sku: sku.to_owned(),
                category: Some(category.to_owned()),
                unit_price: price,
                cost_price: cost,
                reorder_level: reorder,
            },
        )
        .await?;
        stock_service::stock_in(
            db,
            product.id,
            main.id,
            opening,
            Some(StockReason::Purchase),
            Some("opening stock".to_owned()),
        )
        .await?;
    }

    // 5. Staff
    let staff = [
        ("Sanduni Jayasinghe", "Nurse", 85000.0, 650.0),
        ("Ruwan Bandara", "Pharmacist", 95000.0, 700.0),
    ];
    for (name, designation, basic, ot_rate) in staff {
        staff_service::create_staff(
            db,
            StaffInput {
                branch_id: main.id,
                name: name.to_owned(),
                designation: Some(designation.to_owned()),
                email: None,
                phone: None,
                basic_salary: basic,
                ot_rate,
            },
        )
        .await?;
    }

    tracing::info!("Demo data created for branch '{}'", main.name);
    Ok(())
}

async fn seed_disease(state: &AppState, name: &str, doctor_ids: &[i32]) -> Result<i32, DomainError> {
    let db = state.db();
    let disease = disease_service::create_disease(
        db,
        DiseaseInput {
            name: name.to_owned(),
            description: None,
        },
    )
    .await?;
    for doctor_id in doctor_ids {
        disease_service::assign_disease(db, *doctor_id, disease.id).await?;
    }
    Ok(disease.id)
}

async fn seed_question(
    state: &AppState,
    disease_id: i32,
    sort_order: i32,
    question: &str,
    sub_questions: &[&str],
) -> Result<(), DomainError> {
    let db = state.db();
    let main_question = session_service::create_main_question(
        db,
        MainQuestionInput {
            disease_id,
            question: question.to_owned(),
            sort_order: Some(sort_order),
        },
    )
    .await?;
    for (i, sub) in sub_questions.iter().enumerate() {
        session_service::create_sub_question(
            db,
            main_question.id,
            SubQuestionInput {
                question: (*sub).to_owned(),
                sort_order: Some(i as i32 + 1),
            },
        )
        .await?;
    }
    Ok(())
}
