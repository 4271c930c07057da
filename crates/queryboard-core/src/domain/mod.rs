//! Domain model (ids, question record, validation, retention policy, errors).

pub mod errors;
pub mod ids;
pub mod question;
pub mod retention;
pub mod stats;
pub mod time;
pub mod validation;

pub use errors::{ServiceError, StoreError};
pub use ids::QuestionId;
pub use question::{CreatedQuestion, Question, QuestionListItem};
pub use retention::{DEFAULT_CAPACITY, DEFAULT_TTL_SECS, RetentionPolicy};
pub use stats::QuestionStats;
pub use validation::{DonationInput, SubmitQuestion, ValidSubmission, ValidationError};
