//! QuestionStore port - 質問レコードの正本（source of truth）
//!
//! 永続化・索引はアダプタ側の責務です。このクレートには
//! InMemoryQuestionStore（開発・テスト用）と SqliteQuestionStore があります。
//!
//! # 設計原則
//! - 並び順は常に (created_at, id)。created_at が同じなら ID 順
//! - アダプタは自前の TTL 削除を行わない（期限切れの掃除は CleanupLoop が担う）
//! - 操作単位で直列化される。操作をまたぐロックは持たない

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Question, QuestionId, StoreError};

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, question: Question) -> Result<(), StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, StoreError>;

    /// Number of records with `created_at >= since`.
    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<usize, StoreError>;

    /// Sum of all donations, `0.0` when empty.
    async fn sum_donations(&self) -> Result<f64, StoreError>;

    /// Up to `limit` records, newest first.
    async fn list_newest(&self, limit: usize) -> Result<Vec<Question>, StoreError>;

    /// Up to `limit` ids, oldest first.
    async fn oldest_ids(&self, limit: usize) -> Result<Vec<QuestionId>, StoreError>;

    /// Remove the single oldest record, returning its id.
    async fn delete_oldest(&self) -> Result<Option<QuestionId>, StoreError>;

    /// Remove exactly these records; unknown ids are ignored. Returns how many went.
    async fn delete_many(&self, ids: &[QuestionId]) -> Result<usize, StoreError>;

    /// Remove every record with `created_at < cutoff`. Returns how many went.
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;
}
