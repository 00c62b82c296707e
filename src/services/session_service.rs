//! Session Service - doctor question/answer flow
//!
//! A session is opened on an approved appointment for one disease. The
//! doctor walks the disease's main questions; a sub-question is only asked
//! when its main question was answered "yes". Closing the session completes
//! the appointment.

use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::DomainError;
use crate::models::appointment::Entity as Appointment;
use crate::models::disease::Entity as Disease;
use crate::models::doctor_session::{self, Entity as DoctorSession};
use crate::models::main_question::{self, Entity as MainQuestion};
use crate::models::session_answer::{self, Entity as SessionAnswer};
use crate::models::sub_question::{self, Entity as SubQuestion};
use crate::services::appointment_service::{self, AppointmentAction};
use crate::utils::dates::now_rfc3339;

#[derive(Debug, Clone, Deserialize)]
pub struct MainQuestionInput {
    pub disease_id: i32,
    pub question: String,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubQuestionInput {
    pub question: String,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithSubs {
    #[serde(flatten)]
    pub question: main_question::Model,
    pub sub_questions: Vec<sub_question::Model>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub main_question_id: i32,
    pub sub_question_id: Option<i32>,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerDetail {
    pub id: i32,
    pub main_question_id: i32,
    pub sub_question_id: Option<i32>,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: doctor_session::Model,
    pub answers: Vec<AnswerDetail>,
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

pub async fn create_main_question(
    db: &DatabaseConnection,
    input: MainQuestionInput,
) -> Result<main_question::Model, DomainError> {
    if input.question.trim().is_empty() {
        return Err(DomainError::validation("Question text is required"));
    }
    Disease::find_by_id(input.disease_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Disease"))?;

    let sort_order = match input.sort_order {
        Some(order) => order,
        None => {
            MainQuestion::find()
                .filter(main_question::Column::DiseaseId.eq(input.disease_id))
                .count(db)
                .await? as i32
                + 1
        }
    };

    Ok(main_question::ActiveModel {
        disease_id: Set(input.disease_id),
        question: Set(input.question.trim().to_string()),
        sort_order: Set(sort_order),
        created_at: Set(now_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn create_sub_question(
    db: &DatabaseConnection,
    main_question_id: i32,
    input: SubQuestionInput,
) -> Result<sub_question::Model, DomainError> {
    if input.question.trim().is_empty() {
        return Err(DomainError::validation("Question text is required"));
    }
    MainQuestion::find_by_id(main_question_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Main question"))?;

    let sort_order = match input.sort_order {
        Some(order) => order,
        None => {
            SubQuestion::find()
                .filter(sub_question::Column::MainQuestionId.eq(main_question_id))
                .count(db)
                .await? as i32
                + 1
        }
    };

    Ok(sub_question::ActiveModel {
        main_question_id: Set(main_question_id),
        question: Set(input.question.trim().to_string()),
        sort_order: Set(sort_order),
        created_at: Set(now_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// Main questions of a disease in asking order, each with its sub-questions
pub async fn get_all_main_questions(
    db: &DatabaseConnection,
    disease_id: i32,
) -> Result<Vec<QuestionWithSubs>, DomainError> {
    Disease::find_by_id(disease_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Disease"))?;

    let rows = MainQuestion::find()
        .filter(main_question::Column::DiseaseId.eq(disease_id))
        .order_by_asc(main_question::Column::SortOrder)
        .order_by_asc(main_question::Column::Id)
        .find_with_related(SubQuestion)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(question, mut sub_questions)| {
            sub_questions.sort_by_key(|s| (s.sort_order, s.id));
            QuestionWithSubs {
                question,
                sub_questions,
            }
        })
        .collect())
}

/// Open a session on an approved appointment
pub async fn start_session(
    db: &DatabaseConnection,
    appointment_id: i32,
    disease_id: i32,
) -> Result<doctor_session::Model, DomainError> {
    let txn = db.begin().await?;

    let appointment = Appointment::find_by_id(appointment_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Appointment"))?;
    if appointment.status != "approved" {
        return Err(DomainError::invalid_state(format!(
            "Sessions can only start on approved appointments (this one is {})",
            appointment.status
        )));
    }
    Disease::find_by_id(disease_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Disease"))?;

    let existing = DoctorSession::find()
        .filter(doctor_session::Column::AppointmentId.eq(appointment_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(DomainError::conflict(
            "A session already exists for this appointment",
        ));
    }

    let session = doctor_session::ActiveModel {
        appointment_id: Set(appointment.id),
        doctor_id: Set(appointment.doctor_id),
        patient_id: Set(appointment.patient_id),
        disease_id: Set(disease_id),
        status: Set("open".to_owned()),
        notes: Set(None),
        started_at: Set(now_rfc3339()),
        closed_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(session)
}

/// Store answers for an open session. Re-answering a question replaces the
/// previous answer; turning a main answer to anything but "yes" drops the
/// answers given to its sub-questions.
pub async fn submit_answers(
    db: &DatabaseConnection,
    session_id: i32,
    answers: Vec<AnswerInput>,
) -> Result<SessionDetail, DomainError> {
    if answers.is_empty() {
        return Err(DomainError::validation("No answers submitted"));
    }
    if answers.iter().any(|a| a.answer.trim().is_empty()) {
        return Err(DomainError::validation("Answers cannot be blank"));
    }

    // The last answer to a (main, sub) pair within one submission wins
    let mut seen: HashSet<(i32, Option<i32>)> = HashSet::new();
    let mut answers: Vec<AnswerInput> = answers
        .into_iter()
        .rev()
        .filter(|a| seen.insert((a.main_question_id, a.sub_question_id)))
        .collect();
    answers.reverse();

    let txn = db.begin().await?;
    let session = open_session(&txn, session_id).await?;

    let main_ids: HashSet<i32> = MainQuestion::find()
        .filter(main_question::Column::DiseaseId.eq(session.disease_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|q| q.id)
        .collect();
    let sub_parent: HashMap<i32, i32> = if main_ids.is_empty() {
        HashMap::new()
    } else {
        SubQuestion::find()
            .filter(sub_question::Column::MainQuestionId.is_in(main_ids.iter().copied()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| (s.id, s.main_question_id))
            .collect()
    };

    let stored = SessionAnswer::find()
        .filter(session_answer::Column::SessionId.eq(session.id))
        .all(&txn)
        .await?;

    // Main question -> answered "yes", stored answers overlaid by this submission
    let mut main_yes: HashMap<i32, bool> = stored
        .iter()
        .filter(|a| a.sub_question_id.is_none())
        .map(|a| (a.main_question_id, is_yes(&a.answer)))
        .collect();
    for answer in answers.iter().filter(|a| a.sub_question_id.is_none()) {
        main_yes.insert(answer.main_question_id, is_yes(&answer.answer));
    }

    for answer in &answers {
        if !main_ids.contains(&answer.main_question_id) {
            return Err(DomainError::validation(format!(
                "Question {} does not belong to this session's disease",
                answer.main_question_id
            )));
        }
        if let Some(sub_id) = answer.sub_question_id {
            if sub_parent.get(&sub_id) != Some(&answer.main_question_id) {
                return Err(DomainError::validation(format!(
                    "Sub-question {} does not belong to question {}",
                    sub_id, answer.main_question_id
                )));
            }
            if !main_yes.get(&answer.main_question_id).copied().unwrap_or(false) {
                return Err(DomainError::validation(format!(
                    "Sub-question {} needs a 'yes' to question {} first",
                    sub_id, answer.main_question_id
                )));
            }
        }
    }

    let now = now_rfc3339();
    for answer in answers {
        let previous = stored.iter().find(|s| {
            s.main_question_id == answer.main_question_id
                && s.sub_question_id == answer.sub_question_id
        });

        match previous {
            Some(row) => {
                let mut active: session_answer::ActiveModel = row.clone().into();
                active.answer = Set(answer.answer.trim().to_string());
                active.updated_at = Set(now.clone());
                active.update(&txn).await?;
            }
            None => {
                session_answer::ActiveModel {
                    session_id: Set(session.id),
                    main_question_id: Set(answer.main_question_id),
                    sub_question_id: Set(answer.sub_question_id),
                    answer: Set(answer.answer.trim().to_string()),
                    created_at: Set(now.clone()),
                    updated_at: Set(now.clone()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }
    }

    let no_longer_yes: Vec<i32> = main_yes
        .iter()
        .filter(|(_, yes)| !**yes)
        .map(|(id, _)| *id)
        .collect();
    if !no_longer_yes.is_empty() {
        SessionAnswer::delete_many()
            .filter(session_answer::Column::SessionId.eq(session.id))
            .filter(session_answer::Column::SubQuestionId.is_not_null())
            .filter(session_answer::Column::MainQuestionId.is_in(no_longer_yes))
            .exec(&txn)
            .await?;
    }

    let detail = load_detail(&txn, session).await?;
    txn.commit().await?;
    Ok(detail)
}

/// Close the session and complete its appointment
pub async fn close_session(
    db: &DatabaseConnection,
    session_id: i32,
    notes: Option<String>,
) -> Result<SessionDetail, DomainError> {
    let txn = db.begin().await?;
    let session = open_session(&txn, session_id).await?;
    let appointment_id = session.appointment_id;

    let mut active: doctor_session::ActiveModel = session.into();
    active.status = Set("closed".to_owned());
    active.notes = Set(notes);
    active.closed_at = Set(Some(now_rfc3339()));
    let closed = active.update(&txn).await?;

    let appointment = Appointment::find_by_id(appointment_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Appointment"))?;
    appointment_service::transition(&txn, appointment, AppointmentAction::Complete, None).await?;

    let detail = load_detail(&txn, closed).await?;
    txn.commit().await?;
    Ok(detail)
}

pub async fn get_session(db: &DatabaseConnection, session_id: i32) -> Result<SessionDetail, DomainError> {
    let session = DoctorSession::find_by_id(session_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Session"))?;
    load_detail(db, session).await
}

async fn open_session<C: ConnectionTrait>(
    conn: &C,
    session_id: i32,
) -> Result<doctor_session::Model, DomainError> {
    let session = DoctorSession::find_by_id(session_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Session"))?;
    if session.status != "open" {
        return Err(DomainError::invalid_state("Session is already closed"));
    }
    Ok(session)
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    session: doctor_session::Model,
) -> Result<SessionDetail, DomainError> {
    let answers = SessionAnswer::find()
        .filter(session_answer::Column::SessionId.eq(session.id))
        .order_by_asc(session_answer::Column::MainQuestionId)
        .order_by_asc(session_answer::Column::Id)
        .all(conn)
        .await?;

    let main_ids: Vec<i32> = answers.iter().map(|a| a.main_question_id).collect();
    let sub_ids: Vec<i32> = answers.iter().filter_map(|a| a.sub_question_id).collect();

    let mut main_text: HashMap<i32, String> = HashMap::new();
    if !main_ids.is_empty() {
        for q in MainQuestion::find()
            .filter(main_question::Column::Id.is_in(main_ids))
            .all(conn)
            .await?
        {
            main_text.insert(q.id, q.question);
        }
    }
    let mut sub_text: HashMap<i32, String> = HashMap::new();
    if !sub_ids.is_empty() {
        for q in SubQuestion::find()
            .filter(sub_question::Column::Id.is_in(sub_ids))
            .all(conn)
            .await?
        {
            sub_text.insert(q.id, q.question);
        }
    }

    let answers = answers
        .into_iter()
        .map(|a| {
            let question = match a.sub_question_id {
                Some(sub_id) => sub_text.get(&sub_id),
                None => main_text.get(&a.main_question_id),
            }
            .cloned()
            .unwrap_or_default();
            AnswerDetail {
                id: a.id,
                main_question_id: a.main_question_id,
                sub_question_id: a.sub_question_id,
                question,
                answer: a.answer,
            }
        })
        .collect();

    Ok(SessionDetail { session, answers })
}
