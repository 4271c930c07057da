//! QuestionService - list / submit / stats
//!
//! # フロー（submit）
//! 1. SubmitQuestion::validate()（失敗したらストアには触らない）
//! 2. count >= capacity なら最古の 1 件を削除
//! 3. created_at / expires_at を計算して insert

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};

use crate::domain::time::{start_of_day, truncate_to_millis};
use crate::domain::{
    Question, QuestionListItem, QuestionStats, RetentionPolicy, ServiceError, StoreError,
    SubmitQuestion,
};
use crate::ports::{Clock, IdGenerator, QuestionStore};

#[derive(Clone)]
pub struct QuestionService {
    store: Arc<dyn QuestionStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    policy: RetentionPolicy,
}

impl QuestionService {
    pub fn new(
        store: Arc<dyn QuestionStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            ids,
            policy,
        }
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// The public feed: at most `capacity` records, newest first.
    pub async fn list(&self) -> Result<Vec<QuestionListItem>, StoreError> {
        let questions = self.store.list_newest(self.policy.capacity).await?;
        Ok(questions.into_iter().map(QuestionListItem::from).collect())
    }

    /// Validate, make room if the feed is full, then persist.
    pub async fn submit(&self, input: &SubmitQuestion) -> Result<Question, ServiceError> {
        let submission = input.validate()?;

        let count = self.store.count().await?;
        for _ in 0..self.policy.evictions_before_insert(count) {
            if let Some(evicted) = self.store.delete_oldest().await? {
                tracing::info!(question_id = %evicted, count, "capacity reached, evicted oldest question");
            }
        }

        let created_at = truncate_to_millis(self.clock.now());
        let question = Question::new(
            self.ids.generate_question_id(),
            submission,
            created_at,
            self.policy.expires_at(created_at),
        );
        self.store.insert(question.clone()).await?;

        tracing::info!(question_id = %question.id, donation = question.donation, "question submitted");
        Ok(question)
    }

    /// Stats with "today" starting at server-local midnight.
    pub async fn stats(&self) -> Result<QuestionStats, StoreError> {
        let today_start = start_of_day(self.clock.now(), &Local);
        self.stats_since(today_start).await
    }

    /// Stats with "today" starting at `today_start`.
    pub async fn stats_since(&self, today_start: DateTime<Utc>) -> Result<QuestionStats, StoreError> {
        let total_questions = self.store.count().await?;
        let questions_today = self.store.count_created_since(today_start).await?;
        let total_donations = self.store.sum_donations().await?;

        Ok(QuestionStats {
            total_questions: total_questions as u64,
            questions_today: questions_today as u64,
            total_donations,
        })
    }
}
