use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use chrono::TimeDelta;
use queryboard_core::{
    domain::{DEFAULT_CAPACITY, DEFAULT_TTL_SECS, RetentionPolicy},
    impls::{InMemoryQuestionStore, SqliteQuestionStore},
    ports::QuestionStore,
};
use serde::Deserialize;

/// Environment variable prefix, e.g. `QUERYBOARD_PORT`.
pub const ENV_PREFIX: &str = "QUERYBOARD_";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// `memory://`, `sqlite://:memory:` or `sqlite://<path>`.
    #[serde(default = "default_store_url")]
    pub store_url: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    /// Set to "json" for structured logs, anything else for human-readable.
    #[serde(default)]
    pub log_format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_store_url() -> String {
    "sqlite://questions.db".to_string()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS as u64
}

fn default_cleanup_interval_secs() -> u64 {
    60 * 60
}

/// Where questions are kept, parsed from `store_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Memory,
    SqliteMemory,
    SqliteFile(PathBuf),
}

impl StoreTarget {
    pub fn parse(url: &str) -> Result<Self> {
        if url == "memory" || url == "memory://" {
            return Ok(StoreTarget::Memory);
        }
        match url.strip_prefix("sqlite://") {
            Some(":memory:") => Ok(StoreTarget::SqliteMemory),
            Some("") => bail!("store url {url:?} is missing a database path"),
            Some(path) => Ok(StoreTarget::SqliteFile(PathBuf::from(path))),
            None => bail!("unsupported store url {url:?} (expected memory:// or sqlite://<path>)"),
        }
    }

    pub fn open(&self) -> Result<Arc<dyn QuestionStore>> {
        let store: Arc<dyn QuestionStore> = match self {
            StoreTarget::Memory => Arc::new(InMemoryQuestionStore::new()),
            StoreTarget::SqliteMemory => Arc::new(SqliteQuestionStore::open_in_memory()?),
            StoreTarget::SqliteFile(path) => Arc::new(
                SqliteQuestionStore::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?,
            ),
        };
        Ok(store)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Config>()?)
    }

    pub fn is_json_logging(&self) -> bool {
        self.log_format == "json"
    }

    pub fn store_target(&self) -> Result<StoreTarget> {
        StoreTarget::parse(&self.store_url)
    }

    pub fn policy(&self) -> Result<RetentionPolicy> {
        let ttl = i64::try_from(self.ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .with_context(|| format!("ttl_secs out of range: {}", self.ttl_secs))?;
        Ok(RetentionPolicy::new(self.capacity, ttl))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
