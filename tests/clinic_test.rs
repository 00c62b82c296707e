use chrono::{Duration, Local};
use medidesk::db;
use medidesk::domain::DomainError;
use medidesk::infrastructure::AppState;
use medidesk::models::appointment::AppointmentDto;
use medidesk::models::disease::DiseaseInput;
use medidesk::domain::DoctorFilter;
use medidesk::models::session_answer;
use medidesk::models::{BranchInput, DoctorInput, PatientInput};
use sea_orm::{ActiveModelTrait, Set};
use medidesk::services::appointment_service::{self, AppointmentAction, AppointmentFilter};
use medidesk::services::notification_service::{self, RecipientFilter, RecipientType};
use medidesk::services::session_service::{
    self, AnswerInput, MainQuestionInput, SubQuestionInput,
};
use medidesk::services::disease_service;

async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

struct Clinic {
    state: AppState,
    doctor_id: i32,
    patient_id: i32,
}

async fn setup_clinic() -> Clinic {
    let state = setup_test_state().await;
    let branch = state
        .branch_repo
        .create(BranchInput {
            name: "Central".into(),
            address: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap();
    let doctor = state
        .doctor_repo
        .create(DoctorInput {
            branch_id: branch.id,
            name: "Dr. Perera".into(),
            specialization: Some("Cardiology".into()),
            email: None,
            phone: None,
            consultation_fee: 2500.0,
        })
        .await
        .unwrap();
    let patient = state
        .patient_repo
        .create(PatientInput {
            branch_id: Some(branch.id),
            name: "Kamal Fernando".into(),
            date_of_birth: Some("1980-05-17".into()),
            gender: Some("male".into()),
            phone: Some("0771234567".into()),
            email: None,
            address: None,
        })
        .await
        .unwrap();

    Clinic {
        state,
        doctor_id: doctor.id,
        patient_id: patient.id,
    }
}

fn days_from_today(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn booking(clinic: &Clinic, date: String, time: &str) -> AppointmentDto {
    AppointmentDto {
        doctor_id: clinic.doctor_id,
        patient_id: clinic.patient_id,
        appointment_date: date,
        appointment_time: time.to_string(),
        reason: Some("Chest pain".into()),
    }
}

fn inbox(recipient_type: RecipientType, recipient_id: i32) -> RecipientFilter {
    RecipientFilter {
        recipient_type,
        recipient_id: Some(recipient_id),
    }
}

#[tokio::test]
async fn test_booking_notifies_doctor_and_holds_slot() {
    let clinic = setup_clinic().await;
    let db = clinic.state.db();

    let appointment =
        appointment_service::book_appointment(db, booking(&clinic, days_from_today(3), "09:30"))
            .await
            .unwrap();
    assert_eq!(appointment.status, "pending");

    let doctor_inbox = notification_service::list_notifications(
        db,
        inbox(RecipientType::Doctor, clinic.doctor_id),
        true,
    )
    .await
    .unwrap();
    assert_eq!(doctor_inbox.len(), 1);
    assert_eq!(doctor_inbox[0].kind, "appointment_requested");

    let err =
        appointment_service::book_appointment(db, booking(&clinic, days_from_today(3), "09:30"))
            .await
            .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // A rejected booking frees the slot
    appointment_service::update_appointment_status(
        db,
        appointment.id,
        AppointmentAction::Reject,
        Some("Doctor unavailable".into()),
    )
    .await
    .unwrap();
    appointment_service::book_appointment(db, booking(&clinic, days_from_today(3), "09:30"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_booking_validation() {
    let clinic = setup_clinic().await;
    let db = clinic.state.db();

    let err =
        appointment_service::book_appointment(db, booking(&clinic, days_from_today(-1), "10:00"))
            .await
            .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = appointment_service::book_appointment(db, booking(&clinic, "next week".into(), "10:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let mut unknown = booking(&clinic, days_from_today(1), "10:00");
    unknown.doctor_id = 999;
    let err = appointment_service::book_appointment(db, unknown)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(name) if name == "Doctor"));

    clinic.state.doctor_repo.deactivate(clinic.doctor_id).await.unwrap();
    let err = appointment_service::book_appointment(db, booking(&clinic, days_from_today(1), "10:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));
}

#[tokio::test]
async fn test_status_transitions() {
    let clinic = setup_clinic().await;
    let db = clinic.state.db();

    let appointment =
        appointment_service::book_appointment(db, booking(&clinic, days_from_today(2), "11:00"))
            .await
            .unwrap();

    let err = appointment_service::update_appointment_status(
        db,
        appointment.id,
        AppointmentAction::Complete,
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    let approved = appointment_service::update_appointment_status(
        db,
        appointment.id,
        AppointmentAction::Approve,
        Some("See you then".into()),
    )
    .await
    .unwrap();
    assert_eq!(approved.status, "approved");
    assert_eq!(approved.comment.as_deref(), Some("See you then"));

    let cancelled = appointment_service::update_appointment_status(
        db,
        appointment.id,
        AppointmentAction::Cancel,
        None,
    )
    .await
    .unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(cancelled.comment.as_deref(), Some("See you then"));

    let patient_inbox = notification_service::list_notifications(
        db,
        inbox(RecipientType::Patient, clinic.patient_id),
        false,
    )
    .await
    .unwrap();
    assert_eq!(patient_inbox.len(), 2);

    let listed = appointment_service::list_appointments(
        db,
        AppointmentFilter {
            doctor_id: Some(clinic.doctor_id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].doctor_name, "Dr. Perera");
    assert_eq!(listed[0].patient_name, "Kamal Fernando");
}

#[tokio::test]
async fn test_doctor_diseases_flat_rows() {
    let clinic = setup_clinic().await;
    let db = clinic.state.db();

    let hypertension = disease_service::create_disease(
        db,
        DiseaseInput {
            name: "Hypertension".into(),
            description: Some("High blood pressure".into()),
        },
    )
    .await
    .unwrap();
    let asthma = disease_service::create_disease(
        db,
        DiseaseInput {
            name: "Asthma".into(),
            description: None,
        },
    )
    .await
    .unwrap();

    disease_service::assign_disease(db, clinic.doctor_id, hypertension.id)
        .await
        .unwrap();
    disease_service::assign_disease(db, clinic.doctor_id, asthma.id)
        .await
        .unwrap();
    // Idempotent
    disease_service::assign_disease(db, clinic.doctor_id, asthma.id)
        .await
        .unwrap();

    let rows = disease_service::get_all_doctor_diseases(db, Some(clinic.doctor_id))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].disease_name, "Asthma");
    assert_eq!(rows[1].description.as_deref(), Some("High blood pressure"));
    assert_eq!(rows[1].doctor_name, "Dr. Perera");

    disease_service::unassign_disease(db, clinic.doctor_id, asthma.id)
        .await
        .unwrap();
    let err = disease_service::unassign_disease(db, clinic.doctor_id, asthma.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let err = disease_service::create_disease(
        db,
        DiseaseInput {
            name: "Asthma".into(),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

struct Questionnaire {
    disease_id: i32,
    smoke: i32,
    per_day: i32,
    headache: i32,
}

async fn setup_questionnaire(state: &AppState) -> Questionnaire {
    let db = state.db();
    let disease = disease_service::create_disease(
        db,
        DiseaseInput {
            name: "Hypertension".into(),
            description: None,
        },
    )
    .await
    .unwrap();
    let headache = session_service::create_main_question(
        db,
        MainQuestionInput {
            disease_id: disease.id,
            question: "Do you get headaches?".into(),
            sort_order: Some(2),
        },
    )
    .await
    .unwrap();
    let smoke = session_service::create_main_question(
        db,
        MainQuestionInput {
            disease_id: disease.id,
            question: "Do you smoke?".into(),
            sort_order: Some(1),
        },
    )
    .await
    .unwrap();
    let per_day = session_service::create_sub_question(
        db,
        smoke.id,
        SubQuestionInput {
            question: "How many per day?".into(),
            sort_order: None,
        },
    )
    .await
    .unwrap();

    Questionnaire {
        disease_id: disease.id,
        smoke: smoke.id,
        per_day: per_day.id,
        headache: headache.id,
    }
}

fn answer(main: i32, sub: Option<i32>, text: &str) -> AnswerInput {
    AnswerInput {
        main_question_id: main,
        sub_question_id: sub,
        answer: text.to_string(),
    }
}

#[tokio::test]
async fn test_questionnaire_is_ordered() {
    let clinic = setup_clinic().await;
    let q = setup_questionnaire(&clinic.state).await;

    let questions = session_service::get_all_main_questions(clinic.state.db(), q.disease_id)
        .await
        .unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].question.id, q.smoke);
    assert_eq!(questions[0].sub_questions.len(), 1);
    assert_eq!(questions[0].sub_questions[0].sort_order, 1);
    assert_eq!(questions[1].question.id, q.headache);
    assert!(questions[1].sub_questions.is_empty());

    let err = session_service::get_all_main_questions(clinic.state.db(), 999)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_session_flow() {
    let clinic = setup_clinic().await;
    let db = clinic.state.db();
    let q = setup_questionnaire(&clinic.state).await;

    let appointment =
        appointment_service::book_appointment(db, booking(&clinic, days_from_today(1), "08:00"))
            .await
            .unwrap();

    // Pending appointments cannot host a session
    let err = session_service::start_session(db, appointment.id, q.disease_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    appointment_service::update_appointment_status(
        db,
        appointment.id,
        AppointmentAction::Approve,
        None,
    )
    .await
    .unwrap();
    let session = session_service::start_session(db, appointment.id, q.disease_id)
        .await
        .unwrap();
    assert_eq!(session.status, "open");

    let err = session_service::start_session(db, appointment.id, q.disease_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Sub-question without a "yes" on its main question
    let err = session_service::submit_answers(db, session.id, vec![answer(q.smoke, Some(q.per_day), "10")])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let detail = session_service::submit_answers(
        db,
        session.id,
        vec![
            answer(q.smoke, None, "Yes"),
            answer(q.smoke, Some(q.per_day), "10"),
            answer(q.headache, None, "no"),
        ],
    )
    .await
    .unwrap();
    assert_eq!(detail.answers.len(), 3);
    assert!(detail
        .answers
        .iter()
        .any(|a| a.question == "How many per day?" && a.answer == "10"));

    // Re-answering replaces; "no" on the main drops its sub answers
    let detail = session_service::submit_answers(db, session.id, vec![answer(q.smoke, None, "no")])
        .await
        .unwrap();
    assert_eq!(detail.answers.len(), 2);
    assert!(detail.answers.iter().all(|a| a.sub_question_id.is_none()));
    assert!(detail
        .answers
        .iter()
        .any(|a| a.main_question_id == q.smoke && a.answer == "no"));

    let closed = session_service::close_session(db, session.id, Some("Lifestyle advice".into()))
        .await
        .unwrap();
    assert_eq!(closed.session.status, "closed");
    assert_eq!(closed.session.notes.as_deref(), Some("Lifestyle advice"));

    let completed = appointment_service::get_appointment(db, appointment.id)
        .await
        .unwrap();
    assert_eq!(completed.appointment.status, "completed");

    let err = session_service::submit_answers(db, session.id, vec![answer(q.smoke, None, "yes")])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));
}

#[tokio::test]
async fn test_answers_must_match_the_session_disease() {
    let clinic = setup_clinic().await;
    let db = clinic.state.db();
    let q = setup_questionnaire(&clinic.state).await;
    let other = disease_service::create_disease(
        db,
        DiseaseInput {
            name: "Diabetes".into(),
            description: None,
        },
    )
    .await
    .unwrap();
    let thirst = session_service::create_main_question(
        db,
        MainQuestionInput {
            disease_id: other.id,
            question: "Are you often thirsty?".into(),
            sort_order: None,
        },
    )
    .await
    .unwrap();

    let appointment =
        appointment_service::book_appointment(db, booking(&clinic, days_from_today(1), "08:30"))
            .await
            .unwrap();
    appointment_service::update_appointment_status(
        db,
        appointment.id,
        AppointmentAction::Approve,
        None,
    )
    .await
    .unwrap();
    let session = session_service::start_session(db, appointment.id, q.disease_id)
        .await
        .unwrap();

    let err = session_service::submit_answers(db, session.id, vec![answer(thirst.id, None, "yes")])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let detail = session_service::get_session(db, session.id).await.unwrap();
    assert!(detail.answers.is_empty());
}

#[tokio::test]
async fn test_patient_with_appointments_cannot_be_deleted() {
    let clinic = setup_clinic().await;
    let db = clinic.state.db();

    appointment_service::book_appointment(db, booking(&clinic, days_from_today(5), "15:00"))
        .await
        .unwrap();

    let err = clinic
        .state
        .patient_repo
        .delete(clinic.patient_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    let err = clinic.state.patient_repo.delete(999).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

async fn approved_session(clinic: &Clinic, q: &Questionnaire, time: &str) -> i32 {
    let db = clinic.state.db();
    let appointment =
        appointment_service::book_appointment(db, booking(clinic, days_from_today(1), time))
            .await
            .unwrap();
    appointment_service::update_appointment_status(
        db,
        appointment.id,
        AppointmentAction::Approve,
        None,
    )
    .await
    .unwrap();
    session_service::start_session(db, appointment.id, q.disease_id)
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_repeated_answer_in_one_submission_keeps_the_last() {
    let clinic = setup_clinic().await;
    let db = clinic.state.db();
    let q = setup_questionnaire(&clinic.state).await;
    let session_id = approved_session(&clinic, &q, "09:00").await;

    let detail = session_service::submit_answers(
        db,
        session_id,
        vec![answer(q.headache, None, "yes"), answer(q.headache, None, "no")],
    )
    .await
    .unwrap();
    assert_eq!(detail.answers.len(), 1);
    assert_eq!(detail.answers[0].answer, "no");

    let detail = session_service::submit_answers(db, session_id, vec![answer(q.headache, None, "maybe")])
        .await
        .unwrap();
    assert_eq!(detail.answers.len(), 1);
    assert_eq!(detail.answers[0].answer, "maybe");

    // The table itself refuses a second main answer for the same question
    let now = "2026-01-01T00:00:00+00:00".to_string();
    let duplicate = session_answer::ActiveModel {
        session_id: Set(session_id),
        main_question_id: Set(q.headache),
        sub_question_id: Set(None),
        answer: Set("yes".into()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_doctor_requires_existing_branch() {
    let clinic = setup_clinic().await;

    let err = clinic
        .state
        .doctor_repo
        .create(DoctorInput {
            branch_id: 999,
            name: "Dr. Nobody".into(),
            specialization: None,
            email: None,
            phone: None,
            consultation_fee: 1000.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(name) if name == "Branch"));
}

#[tokio::test]
async fn test_list_doctors_filters_and_hides_inactive() {
    let clinic = setup_clinic().await;
    let state = &clinic.state;
    let other_branch = state
        .branch_repo
        .create(BranchInput {
            name: "Galle".into(),
            address: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap();
    let home_branch = state
        .doctor_repo
        .find_by_id(clinic.doctor_id)
        .await
        .unwrap()
        .unwrap()
        .branch_id;

    let doctor = |branch_id: i32, name: &str, specialization: &str| DoctorInput {
        branch_id,
        name: name.to_string(),
        specialization: Some(specialization.to_string()),
        email: None,
        phone: None,
        consultation_fee: 2000.0,
    };
    state
        .doctor_repo
        .create(doctor(home_branch, "Dr. Alwis", "Dermatology"))
        .await
        .unwrap();
    let galle = state
        .doctor_repo
        .create(doctor(other_branch.id, "Dr. Bandara", "Cardiology"))
        .await
        .unwrap();

    let at_home = state
        .doctor_repo
        .find_all(DoctorFilter {
            branch_id: Some(home_branch),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(at_home.len(), 2);

    let cardiologists = state
        .doctor_repo
        .find_all(DoctorFilter {
            specialization: Some("Cardiology".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<&str> = cardiologists.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Dr. Bandara", "Dr. Perera"]);

    state.doctor_repo.deactivate(galle.id).await.unwrap();
    let active = state
        .doctor_repo
        .find_all(DoctorFilter::default())
        .await
        .unwrap();
    assert_eq!(active.len(), 2);
    let everyone = state
        .doctor_repo
        .find_all(DoctorFilter {
            include_inactive: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(everyone.len(), 3);

    state.branch_repo.deactivate(other_branch.id).await.unwrap();
    let branches = state.branch_repo.find_all(true).await.unwrap();
    assert_eq!(branches.len(), 1);
    assert_eq!(state.branch_repo.find_all(false).await.unwrap().len(), 2);
}

fn walk_in(branch_id: Option<i32>, name: &str, phone: &str) -> PatientInput {
    PatientInput {
        branch_id,
        name: name.to_string(),
        date_of_birth: None,
        gender: None,
        phone: Some(phone.to_string()),
        email: None,
        address: None,
    }
}

#[tokio::test]
async fn test_patient_search_matches_phone_fragment() {
    let clinic = setup_clinic().await;
    let repo = &clinic.state.patient_repo;
    repo.create(walk_in(None, "Sunil Jayasuriya", "0719876543"))
        .await
        .unwrap();

    let by_phone = repo.find_all(Some("98765".into())).await.unwrap();
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].name, "Sunil Jayasuriya");

    let by_name = repo.find_all(Some("Fernando".into())).await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, clinic.patient_id);

    assert_eq!(repo.find_all(Some("  ".into())).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_patient_branch_must_exist() {
    let clinic = setup_clinic().await;
    let repo = &clinic.state.patient_repo;

    let err = repo
        .create(walk_in(Some(999), "Nimal", "0770000000"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(name) if name == "Branch"));

    let err = repo
        .update(clinic.patient_id, walk_in(Some(999), "Kamal Fernando", "0771234567"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(name) if name == "Branch"));

    // No branch at all is fine
    repo.create(walk_in(None, "Nimal", "0770000000"))
        .await
        .unwrap();
}
