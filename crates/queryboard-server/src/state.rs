use queryboard_core::app::{QuestionService, Status};

#[derive(Clone)]
pub struct AppState {
    /// List / submit / stats over the question store.
    pub service: QuestionService,
    /// Process start and clock, for health checks.
    pub status: Status,
}
