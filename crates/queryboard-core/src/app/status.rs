//! Status - ヘルスチェック用のステータス
//!
//! 生存確認のみ（ストアへの疎通確認はしない）。

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::time::rfc3339_millis;
use crate::ports::Clock;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(with = "rfc3339_millis")]
    pub timestamp: DateTime<Utc>,
    /// Seconds since the process started serving.
    pub uptime: f64,
}

/// Tracks process start so health checks can report uptime.
#[derive(Clone)]
pub struct Status {
    started: Instant,
    clock: Arc<dyn Clock>,
}

impl Status {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            started: Instant::now(),
            clock,
        }
    }

    pub fn report(&self) -> HealthReport {
        HealthReport {
            status: "OK",
            timestamp: self.clock.now(),
            uptime: self.started.elapsed().as_secs_f64(),
        }
    }
}
