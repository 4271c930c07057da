//! Health check endpoint for load balancers and monitoring.
//!
//! Liveness only: always 200 while the process is serving.

use axum::{Json, Router, extract::State, routing::get};
use queryboard_core::app::HealthReport;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.status.report())
}
