use serde::{Deserialize, Serialize};

/// Aggregate figures for `GET /api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub total_questions: u64,
    /// Questions created since server-local midnight.
    pub questions_today: u64,
    pub total_donations: f64,
}
