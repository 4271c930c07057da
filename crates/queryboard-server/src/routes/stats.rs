use axum::{Json, Router, extract::State, routing::get};
use queryboard_core::domain::QuestionStats;

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<QuestionStats>, AppError> {
    Ok(Json(state.service.stats().await?))
}
