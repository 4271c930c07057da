//! CleanupLoop - 期限切れ・超過分の定期削除
//!
//! # フロー（1 回の実行）
//! 1. created_at < now - ttl のレコードを一括削除
//! 2. 件数を数え直し、capacity を超えていれば最古から超過分だけ削除
//!
//! どちらの段階も冪等。失敗はログに出して次の tick を待つ。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;

use crate::domain::{RetentionPolicy, StoreError};
use crate::ports::{Clock, QuestionStore};

/// Outcome of one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Removed for being older than the ttl.
    pub expired: usize,
    /// Removed to bring the collection back to capacity.
    pub trimmed: usize,
}

pub struct CleanupLoop {
    store: Arc<dyn QuestionStore>,
    clock: Arc<dyn Clock>,
    policy: RetentionPolicy,
    interval: Duration,
}

impl CleanupLoop {
    pub fn new(
        store: Arc<dyn QuestionStore>,
        clock: Arc<dyn Clock>,
        policy: RetentionPolicy,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the expiry sweep, then the capacity trim.
    pub async fn run_once(&self) -> Result<CleanupReport, StoreError> {
        let now = self.clock.now();

        let expired = self
            .store
            .delete_created_before(self.policy.expiry_cutoff(now))
            .await?;
        if expired > 0 {
            tracing::info!(removed = expired, "removed expired questions");
        }

        let count = self.store.count().await?;
        let excess = self.policy.excess(count);
        let mut trimmed = 0;
        if excess > 0 {
            let oldest = self.store.oldest_ids(excess).await?;
            trimmed = self.store.delete_many(&oldest).await?;
            tracing::info!(
                removed = trimmed,
                capacity = self.policy.capacity,
                "removed excess questions to stay within capacity"
            );
        }

        Ok(CleanupReport { expired, trimmed })
    }

    /// Run on every interval boundary until `shutdown` flips to `true` or its sender goes away.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "cleanup loop started");

        loop {
            let now = self.clock.now();
            let wait = (next_run_after(now, self.interval) - now)
                .to_std()
                .unwrap_or(self.interval);

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    tracing::debug!("running cleanup task");
                    if let Err(err) = self.run_once().await {
                        tracing::error!(error = %err, "error during cleanup task");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("cleanup loop stopped");
    }
}

/// Next instant after `now` that is a whole multiple of `interval` since the Unix epoch.
///
/// With a one-hour interval this is the top of the next hour.
pub fn next_run_after(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    let step = i64::try_from(interval.as_millis()).unwrap_or(i64::MAX).max(1);
    let next_ms = (now.timestamp_millis().div_euclid(step) + 1).saturating_mul(step);

    DateTime::from_timestamp_millis(next_ms)
        .unwrap_or_else(|| now + TimeDelta::milliseconds(step))
}
