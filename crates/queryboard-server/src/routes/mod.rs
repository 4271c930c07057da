//! HTTP routes under `/api`.
//!
//! - GET  /api/questions - public feed, newest first
//! - POST /api/questions - submit a question
//! - GET  /api/stats     - totals and today's count
//! - GET  /api/health    - liveness

pub mod health;
pub mod questions;
pub mod stats;

use axum::Router;

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(questions::router())
        .merge(stats::router())
        .merge(health::router())
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
