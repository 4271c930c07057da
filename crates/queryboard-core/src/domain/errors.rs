//! Errors - エラー型と分類
//!
//! # 分類
//! - Validation: クライアント側で直せるエラー（400）
//! - Store: ストアの障害（500、詳細はログのみ）

use super::validation::ValidationError;

/// Failure inside a store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not execute the operation.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A persisted row could not be decoded into a `Question`.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Backend(format!("blocking task failed: {err}"))
    }
}

/// Error surfaced by the question service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

