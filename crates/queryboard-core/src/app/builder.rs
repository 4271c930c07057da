//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 省略された port はデフォルト実装で埋める

use std::sync::Arc;
use std::time::Duration;

use crate::app::{CleanupLoop, QuestionService, Status};
use crate::domain::RetentionPolicy;
use crate::ports::{Clock, IdGenerator, QuestionStore, SystemClock, UlidGenerator};

/// Default spacing between cleanup runs.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .store(Arc::new(InMemoryQuestionStore::new()))
///     .policy(RetentionPolicy::default())
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - store は必須（未設定なら BuildError::MissingStore）
/// - capacity / ttl / cleanup interval はゼロ以下を拒否
/// - 現在時刻 ± ttl が日時の範囲外になる ttl も拒否
pub struct AppBuilder {
    store: Option<Arc<dyn QuestionStore>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    policy: RetentionPolicy,
    cleanup_interval: Duration,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no question store configured")]
    MissingStore,

    #[error("capacity must be at least 1")]
    ZeroCapacity,

    #[error("ttl must be positive")]
    NonPositiveTtl,

    #[error("ttl is too large to compute an expiry time")]
    TtlOutOfRange,

    #[error("cleanup interval must be positive")]
    ZeroCleanupInterval,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            clock: None,
            ids: None,
            policy: RetentionPolicy::default(),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }

    pub fn store(mut self, store: Arc<dyn QuestionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 省略時は SystemClock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// 省略時は clock を使う UlidGenerator
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn policy(mut self, policy: RetentionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// 検証してから App を生成
    pub fn build(self) -> Result<App, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        if self.policy.capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        if self.policy.ttl <= chrono::TimeDelta::zero() {
            return Err(BuildError::NonPositiveTtl);
        }
        if self.cleanup_interval.is_zero() {
            return Err(BuildError::ZeroCleanupInterval);
        }

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let now = clock.now();
        if now.checked_add_signed(self.policy.ttl).is_none()
            || now.checked_sub_signed(self.policy.ttl).is_none()
        {
            return Err(BuildError::TtlOutOfRange);
        }
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))) as Arc<dyn IdGenerator>);

        Ok(App {
            service: QuestionService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                ids,
                self.policy,
            ),
            cleanup: CleanupLoop::new(store, Arc::clone(&clock), self.policy, self.cleanup_interval),
            status: Status::new(clock),
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App はワイヤリング済みのコンポーネント一式
pub struct App {
    pub service: QuestionService,
    pub cleanup: CleanupLoop,
    pub status: Status,
}
