//! SQLite question store.
//!
//! One `questions` table; timestamps are stored as Unix milliseconds and the
//! `(created_at_ms, id)` index backs every ordered query.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{Question, QuestionId, StoreError};
use crate::ports::QuestionStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS questions (
    id            TEXT PRIMARY KEY,
    question      TEXT NOT NULL,
    email         TEXT NOT NULL,
    donation      REAL NOT NULL,
    created_at_ms INTEGER NOT NULL,
    expires_at_ms INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_questions_created ON questions(created_at_ms, id);
";

/// Columns as read from a row, before domain decoding.
type RawRow = (String, String, String, f64, i64, i64);

#[derive(Clone)]
pub struct SqliteQuestionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteQuestionStore {
    /// Open (or create) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Private in-process database, gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| StoreError::Backend("sqlite connection mutex poisoned".to_string()))?;
            f(&mut conn)
        })
        .await?
    }
}

fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Corrupt(format!("timestamp out of range: {ms}")))
}

fn parse_id(raw: &str) -> Result<QuestionId, StoreError> {
    raw.parse()
        .map_err(|e| StoreError::Corrupt(format!("bad id {raw:?}: {e}")))
}

fn decode(row: RawRow) -> Result<Question, StoreError> {
    let (id, question, email, donation, created_at_ms, expires_at_ms) = row;
    Ok(Question {
        id: parse_id(&id)?,
        question,
        email,
        donation,
        created_at: from_millis(created_at_ms)?,
        expires_at: from_millis(expires_at_ms)?,
    })
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn to_count(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

#[async_trait]
impl QuestionStore for SqliteQuestionStore {
    async fn insert(&self, question: Question) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO questions
                 (id, question, email, donation, created_at_ms, expires_at_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    question.id.to_string(),
                    question.question,
                    question.email,
                    question.donation,
                    to_millis(question.created_at),
                    to_millis(question.expires_at),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
            Ok(to_count(n))
        })
        .await
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<usize, StoreError> {
        self.with_conn(move |conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM questions WHERE created_at_ms >= ?1",
                params![to_millis(since)],
                |row| row.get(0),
            )?;
            Ok(to_count(n))
        })
        .await
    }

    async fn sum_donations(&self) -> Result<f64, StoreError> {
        self.with_conn(|conn| {
            let total: f64 = conn.query_row(
                "SELECT COALESCE(SUM(donation), 0.0) FROM questions",
                [],
                |row| row.get(0),
            )?;
            Ok(total)
        })
        .await
    }

    async fn list_newest(&self, limit: usize) -> Result<Vec<Question>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, question, email, donation, created_at_ms, expires_at_ms
                 FROM questions ORDER BY created_at_ms DESC, id DESC LIMIT ?1",
            )?;
            let rows = stmt
                .query_map(params![sql_limit(limit)], |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                })?
                .collect::<Result<Vec<RawRow>, _>>()?;
            rows.into_iter().map(decode).collect()
        })
        .await
    }

    async fn oldest_ids(&self, limit: usize) -> Result<Vec<QuestionId>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id FROM questions ORDER BY created_at_ms ASC, id ASC LIMIT ?1",
            )?;
            let ids = stmt
                .query_map(params![sql_limit(limit)], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            ids.iter().map(|id| parse_id(id)).collect()
        })
        .await
    }

    async fn delete_oldest(&self) -> Result<Option<QuestionId>, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let oldest: Option<String> = tx
                .query_row(
                    "SELECT id FROM questions ORDER BY created_at_ms ASC, id ASC LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(raw) = oldest else {
                return Ok(None);
            };
            tx.execute("DELETE FROM questions WHERE id = ?1", params![raw])?;
            tx.commit()?;
            parse_id(&raw).map(Some)
        })
        .await
    }

    async fn delete_many(&self, ids: &[QuestionId]) -> Result<usize, StoreError> {
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let mut removed = 0;
            {
                let mut stmt = tx.prepare_cached("DELETE FROM questions WHERE id = ?1")?;
                for id in &ids {
                    removed += stmt.execute(params![id])?;
                }
            }
            tx.commit()?;
            Ok(removed)
        })
        .await
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        self.with_conn(move |conn| {
            let removed = conn.execute(
                "DELETE FROM questions WHERE created_at_ms < ?1",
                params![to_millis(cutoff)],
            )?;
            Ok(removed)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use ulid::Ulid;

    fn question_at(created_at: DateTime<Utc>, donation: f64) -> Question {
        Question {
            id: QuestionId::from(Ulid::new()),
            question: "What is a borrow checker?".to_string(),
            email: "a@b.co".to_string(),
            donation,
            created_at,
            expires_at: created_at + TimeDelta::hours(24),
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.db");
        let q = question_at(base() + TimeDelta::milliseconds(123), 4.2);

        {
            let store = SqliteQuestionStore::open(&path).unwrap();
            store.insert(q.clone()).await.unwrap();
        }

        let store = SqliteQuestionStore::open(&path).unwrap();
        let listed = store.list_newest(10).await.unwrap();
        assert_eq!(listed, vec![q]);
    }

    #[tokio::test]
    async fn ordered_queries() {
        let store = SqliteQuestionStore::open_in_memory().unwrap();
        let t1 = question_at(base(), 1.0);
        let t2 = question_at(base() + TimeDelta::seconds(1), 2.0);
        let t3 = question_at(base() + TimeDelta::seconds(2), 3.0);
        for q in [&t2, &t3, &t1] {
            store.insert(q.clone()).await.unwrap();
        }

        let newest: Vec<_> = store
            .list_newest(10)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(newest, vec![t3.id, t2.id, t1.id]);
        assert_eq!(store.oldest_ids(2).await.unwrap(), vec![t1.id, t2.id]);

        assert_eq!(store.delete_oldest().await.unwrap(), Some(t1.id));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn deletes_and_aggregates() {
        let store = SqliteQuestionStore::open_in_memory().unwrap();
        assert_eq!(store.sum_donations().await.unwrap(), 0.0);
        assert_eq!(store.delete_oldest().await.unwrap(), None);

        let old = question_at(base(), 1.25);
        let mid = question_at(base() + TimeDelta::hours(1), 2.0);
        let new = question_at(base() + TimeDelta::hours(2), 0.75);
        for q in [&old, &mid, &new] {
            store.insert(q.clone()).await.unwrap();
        }

        assert_eq!(store.sum_donations().await.unwrap(), 4.0);
        assert_eq!(
            store
                .count_created_since(base() + TimeDelta::hours(1))
                .await
                .unwrap(),
            2
        );

        let removed = store
            .delete_created_before(base() + TimeDelta::hours(1))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let unknown = QuestionId::from(Ulid::new());
        assert_eq!(store.delete_many(&[mid.id, unknown]).await.unwrap(), 1);
        assert_eq!(store.oldest_ids(10).await.unwrap(), vec![new.id]);
    }
}
