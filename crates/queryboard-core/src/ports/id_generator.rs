//! IdGenerator port - ID 生成の抽象化
//!
//! テスト容易性のために trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use ulid::{Generator, Ulid};

use crate::domain::QuestionId;
use crate::ports::Clock;

/// IdGenerator は Question の ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数のリクエストから同時に使われる）
pub trait IdGenerator: Send + Sync {
    fn generate_question_id(&self) -> QuestionId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock の時刻を timestamp 部に使うので、FixedClock を渡せば
/// timestamp 部が決定的になる。同一ミリ秒内では単調増加。
pub struct UlidGenerator<C> {
    clock: C,
    monotonic: Mutex<Generator>,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            monotonic: Mutex::new(Generator::new()),
        }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_question_id(&self) -> QuestionId {
        let now = self.clock.now();
        let mut generator = self.monotonic.lock().unwrap_or_else(PoisonError::into_inner);
        let ulid = generator
            .generate_from_datetime(SystemTime::from(now))
            .unwrap_or_else(|_| Ulid::from_parts(now.timestamp_millis() as u64, rand::random()));
        QuestionId::from(ulid)
    }
}
