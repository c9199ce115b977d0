//! In-process token store for tests and local runs

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{MarkUsedOutcome, StoreError, TokenStore};
use crate::models::{NewRefreshRecord, RefreshRecord};

#[derive(Default)]
struct Inner {
    records: RwLock<HashMap<i64, RefreshRecord>>,
    next_id: AtomicI64,
}

/// Thread-safe map-backed store with the same CAS semantics as Postgres.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<Inner>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, used or not
    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of every stored record
    pub async fn records(&self) -> Vec<RefreshRecord> {
        let mut records: Vec<_> = self.inner.records.read().await.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        records
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, record: NewRefreshRecord) -> Result<RefreshRecord, StoreError> {
        let mut records = self.inner.records.write().await;

        if records
            .values()
            .any(|r| r.access_token_id == record.access_token_id)
        {
            return Err(StoreError::Duplicate);
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = RefreshRecord {
            id,
            user_id: record.user_id,
            access_token_id: record.access_token_id,
            refresh_token_hash: record.refresh_token_hash,
            client_ip: record.client_ip,
            created_at: Utc::now(),
            expires_at: record.expires_at,
            used: false,
        };
        records.insert(id, saved.clone());

        Ok(saved)
    }

    async fn find_by_access_token_id(
        &self,
        access_token_id: &str,
    ) -> Result<Option<RefreshRecord>, StoreError> {
        let records = self.inner.records.read().await;
        Ok(records
            .values()
            .find(|r| r.access_token_id == access_token_id)
            .cloned())
    }

    async fn mark_used(&self, id: i64) -> Result<MarkUsedOutcome, StoreError> {
        // Check and flip under one write guard
        let mut records = self.inner.records.write().await;
        match records.get_mut(&id) {
            Some(record) if !record.used => {
                record.used = true;
                Ok(MarkUsedOutcome::Marked)
            }
            _ => Ok(MarkUsedOutcome::AlreadyUsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_record(jti: &str) -> NewRefreshRecord {
        NewRefreshRecord {
            user_id: "u1".to_string(),
            access_token_id: jti.to_string(),
            refresh_token_hash: "hash".to_string(),
            client_ip: "1.1.1.1".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = MemoryTokenStore::new();
        let saved = store.save(new_record("jti-1")).await.unwrap();
        assert!(!saved.used);

        let found = store.find_by_access_token_id("jti-1").await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);
        assert!(store.find_by_access_token_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_access_token_id_rejected() {
        let store = MemoryTokenStore::new();
        store.save(new_record("jti-1")).await.unwrap();
        let err = store.save(new_record("jti-1")).await.unwrap_err();
        assert_eq!(err, StoreError::Duplicate);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_mark_used_only_once() {
        let store = MemoryTokenStore::new();
        let saved = store.save(new_record("jti-1")).await.unwrap();

        assert_eq!(store.mark_used(saved.id).await.unwrap(), MarkUsedOutcome::Marked);
        assert_eq!(
            store.mark_used(saved.id).await.unwrap(),
            MarkUsedOutcome::AlreadyUsed
        );
        assert!(store.records().await[0].used);
    }

    #[tokio::test]
    async fn test_mark_used_unknown_id() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.mark_used(99).await.unwrap(), MarkUsedOutcome::AlreadyUsed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mark_used_single_winner() {
        let store = MemoryTokenStore::new();
        let id = store.save(new_record("jti-1")).await.unwrap().id;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.mark_used(id).await.unwrap() })
            })
            .collect();

        let mut marked = 0;
        for handle in handles {
            if handle.await.unwrap() == MarkUsedOutcome::Marked {
                marked += 1;
            }
        }
        assert_eq!(marked, 1);
    }
}
