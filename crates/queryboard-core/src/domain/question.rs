//! Question - 投稿された質問レコード
//!
//! Records are immutable after creation: there is no update path, only
//! insert and delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::QuestionId;
use super::time::rfc3339_millis;
use super::validation::ValidSubmission;

/// A stored question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub email: String,
    pub donation: f64,
    #[serde(with = "rfc3339_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339_millis")]
    pub expires_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        id: QuestionId,
        submission: ValidSubmission,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            question: submission.question,
            email: submission.email,
            donation: submission.donation,
            created_at,
            expires_at,
        }
    }
}

/// Public feed entry (`GET /api/questions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionListItem {
    #[serde(rename = "_id")]
    pub id: QuestionId,
    pub question: String,
    pub email: String,
    pub donation: f64,
    #[serde(with = "rfc3339_millis")]
    pub created_at: DateTime<Utc>,
}

impl From<Question> for QuestionListItem {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.question,
            email: q.email,
            donation: q.donation,
            created_at: q.created_at,
        }
    }
}

/// Creation acknowledgement. The email is left out on purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedQuestion {
    #[serde(rename = "_id")]
    pub id: QuestionId,
    pub question: String,
    pub donation: f64,
    #[serde(with = "rfc3339_millis")]
    pub created_at: DateTime<Utc>,
}

impl From<&Question> for CreatedQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question: q.question.clone(),
            donation: q.donation,
            created_at: q.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ulid::Ulid;

    fn sample() -> Question {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Question {
            id: QuestionId::from(Ulid::new()),
            question: "Why is the sky blue?".to_string(),
            email: "someone@example.com".to_string(),
            donation: 2.5,
            created_at,
            expires_at: created_at + chrono::TimeDelta::hours(24),
        }
    }

    #[test]
    fn list_item_exposes_feed_fields() {
        let q = sample();
        let json = serde_json::to_value(QuestionListItem::from(q.clone())).unwrap();

        assert_eq!(json["_id"], q.id.to_string());
        assert_eq!(json["email"], "someone@example.com");
        assert_eq!(json["createdAt"], "2024-01-01T12:00:00.000Z");
        assert!(json.get("expiresAt").is_none());
    }

    #[test]
    fn created_view_omits_email() {
        let q = sample();
        let json = serde_json::to_value(CreatedQuestion::from(&q)).unwrap();

        assert!(json.get("email").is_none());
        assert_eq!(json["donation"], 2.5);
        assert_eq!(json["question"], "Why is the sky blue?");
    }
}
