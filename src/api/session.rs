//! Doctor session handlers: questionnaires, sessions and answers

use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::response::{ApiResult, created, ok};
use crate::services::session_service::{
    self, AnswerInput, MainQuestionInput, SubQuestionInput,
};

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub appointment_id: i32,
    pub disease_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CloseSessionRequest {
    pub notes: Option<String>,
}

/// GET /api/diseases/:id/questions - main questions with their sub-questions
#[utoipa::path(
    get,
    path = "/api/diseases/{id}/questions",
    params(("id" = i32, Path, description = "Disease ID")),
    responses(
        (status = 200, description = "Questionnaire for the disease"),
        (status = 404, description = "Disease not found")
    )
)]
pub async fn get_all_main_questions(
    State(db): State<DatabaseConnection>,
    Path(disease_id): Path<i32>,
) -> ApiResult {
    let questions = session_service::get_all_main_questions(&db, disease_id).await?;
    ok("Questions retrieved", questions)
}

pub async fn create_main_question(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<MainQuestionInput>,
) -> ApiResult {
    let question = session_service::create_main_question(&db, payload).await?;
    created("Question created", question)
}

pub async fn create_sub_question(
    State(db): State<DatabaseConnection>,
    Path(main_question_id): Path<i32>,
    Json(payload): Json<SubQuestionInput>,
) -> ApiResult {
    let question = session_service::create_sub_question(&db, main_question_id, payload).await?;
    created("Sub-question created", question)
}

pub async fn start_session(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<StartSessionRequest>,
) -> ApiResult {
    let session =
        session_service::start_session(&db, payload.appointment_id, payload.disease_id).await?;
    created("Session started", session)
}

pub async fn get_session(State(db): State<DatabaseConnection>, Path(id): Path<i32>) -> ApiResult {
    ok("Session retrieved", session_service::get_session(&db, id).await?)
}

pub async fn submit_answers(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<SubmitAnswersRequest>,
) -> ApiResult {
    let detail = session_service::submit_answers(&db, id, payload.answers).await?;
    ok("Answers saved", detail)
}

pub async fn close_session(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    payload: Option<Json<CloseSessionRequest>>,
) -> ApiResult {
    let notes = payload.and_then(|Json(body)| body.notes);
    let detail = session_service::close_session(&db, id, notes).await?;
    ok("Session closed", detail)
}
