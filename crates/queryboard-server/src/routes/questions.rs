//! Question feed endpoints.
//!
//! Submissions are validated before the store is touched; at capacity the
//! oldest question is evicted to make room for the new one.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use queryboard_core::domain::{CreatedQuestion, QuestionListItem, SubmitQuestion};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/questions", get(list_questions).post(submit_question))
}

#[derive(Serialize)]
struct SubmitResponse {
    message: &'static str,
    question: CreatedQuestion,
}

async fn list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionListItem>>, AppError> {
    Ok(Json(state.service.list().await?))
}

async fn submit_question(
    State(state): State<AppState>,
    payload: Result<Json<SubmitQuestion>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "rejected question body");
        AppError::BadRequest("Invalid request body")
    })?;

    let question = state.service.submit(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Question submitted successfully",
            question: CreatedQuestion::from(&question),
        }),
    ))
}
