//! In-memory question store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{Question, QuestionId, StoreError};
use crate::ports::QuestionStore;

/// Ordering key: creation time, then id.
type CreationKey = (DateTime<Utc>, QuestionId);

/// In-memory store state.
#[derive(Default)]
struct InMemoryStoreState {
    /// All records, ordered oldest first (single source of truth).
    by_creation: BTreeMap<CreationKey, Question>,

    /// id -> creation key, for deletes by id.
    keys: HashMap<QuestionId, CreationKey>,
}

impl InMemoryStoreState {
    fn insert(&mut self, question: Question) {
        let key = (question.created_at, question.id);
        if let Some(previous) = self.keys.insert(question.id, key) {
            self.by_creation.remove(&previous);
        }
        self.by_creation.insert(key, question);
    }

    fn remove(&mut self, id: &QuestionId) -> bool {
        match self.keys.remove(id) {
            Some(key) => self.by_creation.remove(&key).is_some(),
            None => false,
        }
    }

    fn remove_oldest(&mut self) -> Option<QuestionId> {
        let ((_, id), _) = self.by_creation.pop_first()?;
        self.keys.remove(&id);
        Some(id)
    }

    /// Drop every record created before `cutoff`.
    fn remove_created_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        // split_off keeps keys >= (cutoff, min id) in the returned map.
        let retained = self
            .by_creation
            .split_off(&(cutoff, QuestionId::from_ulid(ulid::Ulid::nil())));
        let expired = std::mem::replace(&mut self.by_creation, retained);
        for (_, id) in expired.keys() {
            self.keys.remove(id);
        }
        expired.len()
    }
}

/// Store backed by a `BTreeMap` behind a tokio `Mutex`.
///
/// Each operation takes the lock once, so individual operations are
/// serialized but sequences of them are not.
#[derive(Clone, Default)]
pub struct InMemoryQuestionStore {
    state: Arc<Mutex<InMemoryStoreState>>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn insert(&self, question: Question) -> Result<(), StoreError> {
        self.state.lock().await.insert(question);
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.state.lock().await.by_creation.len())
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<usize, StoreError> {
        let state = self.state.lock().await;
        let count = state
            .by_creation
            .range((since, QuestionId::from_ulid(ulid::Ulid::nil()))..)
            .count();
        Ok(count)
    }

    async fn sum_donations(&self) -> Result<f64, StoreError> {
        let state = self.state.lock().await;
        Ok(state.by_creation.values().map(|q| q.donation).sum())
    }

    async fn list_newest(&self, limit: usize) -> Result<Vec<Question>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .by_creation
            .values()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn oldest_ids(&self, limit: usize) -> Result<Vec<QuestionId>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .by_creation
            .keys()
            .take(limit)
            .map(|(_, id)| *id)
            .collect())
    }

    async fn delete_oldest(&self) -> Result<Option<QuestionId>, StoreError> {
        Ok(self.state.lock().await.remove_oldest())
    }

    async fn delete_many(&self, ids: &[QuestionId]) -> Result<usize, StoreError> {
        let mut state = self.state.lock().await;
        Ok(ids.iter().filter(|id| state.remove(id)).count())
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        Ok(self.state.lock().await.remove_created_before(cutoff))
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
            question: "q".to_string(),
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
    async fn list_is_newest_first() {
        let store = InMemoryQuestionStore::new();
        let t1 = question_at(base(), 1.0);
        let t2 = question_at(base() + TimeDelta::seconds(1), 1.0);
        let t3 = question_at(base() + TimeDelta::seconds(2), 1.0);

        // Insertion order does not matter, creation time does.
        store.insert(t2.clone()).await.unwrap();
        store.insert(t3.clone()).await.unwrap();
        store.insert(t1.clone()).await.unwrap();

        let ids: Vec<_> = store
            .list_newest(10)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec![t3.id, t2.id, t1.id]);

        assert_eq!(store.list_newest(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_oldest_removes_smallest_created_at() {
        let store = InMemoryQuestionStore::new();
        let old = question_at(base(), 1.0);
        let new = question_at(base() + TimeDelta::minutes(1), 1.0);
        store.insert(new.clone()).await.unwrap();
        store.insert(old.clone()).await.unwrap();

        assert_eq!(store.delete_oldest().await.unwrap(), Some(old.id));
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.oldest_ids(5).await.unwrap(), vec![new.id]);
    }

    #[tokio::test]
    async fn delete_oldest_on_empty_store_is_none() {
        let store = InMemoryQuestionStore::new();
        assert_eq!(store.delete_oldest().await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_created_before_is_exclusive_of_cutoff() {
        let store = InMemoryQuestionStore::new();
        store.insert(question_at(base(), 1.0)).await.unwrap();
        let at_cutoff = question_at(base() + TimeDelta::hours(1), 1.0);
        store.insert(at_cutoff.clone()).await.unwrap();
        store
            .insert(question_at(base() + TimeDelta::hours(2), 1.0))
            .await
            .unwrap();

        let removed = store
            .delete_created_before(base() + TimeDelta::hours(1))
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.oldest_ids(1).await.unwrap(), vec![at_cutoff.id]);
        // The id index follows the ordered map.
        assert_eq!(store.delete_many(&[at_cutoff.id]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_many_ignores_unknown_ids() {
        let store = InMemoryQuestionStore::new();
        let q = question_at(base(), 1.0);
        store.insert(q.clone()).await.unwrap();

        let unknown = QuestionId::from(Ulid::new());
        assert_eq!(store.delete_many(&[unknown, q.id, q.id]).await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn aggregates() {
        let store = InMemoryQuestionStore::new();
        assert_eq!(store.sum_donations().await.unwrap(), 0.0);

        store.insert(question_at(base(), 1.5)).await.unwrap();
        store
            .insert(question_at(base() + TimeDelta::hours(5), 2.5))
            .await
            .unwrap();

        assert_eq!(store.sum_donations().await.unwrap(), 4.0);
        assert_eq!(
            store
                .count_created_since(base() + TimeDelta::hours(5))
                .await
                .unwrap(),
            1
        );
    }
}
