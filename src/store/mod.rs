//! Refresh-token persistence
//!
//! The core only talks to [`TokenStore`]; the service wires in [`PgTokenStore`],
//! tests use [`MemoryTokenStore`]. Both honour the same compare-and-swap contract
//! for [`TokenStore::mark_used`].

mod memory;
mod postgres;

pub use memory::MemoryTokenStore;
pub use postgres::PgTokenStore;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewRefreshRecord, RefreshRecord};

/// Errors surfaced by token store backends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage backend failure: {0}")]
    Backend(String),

    #[error("Access token id already has a refresh record")]
    Duplicate,

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate,
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Result of the conditional `used = false -> true` transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkUsedOutcome {
    /// This caller performed the transition.
    Marked,
    /// The record was already used (or no longer exists).
    AlreadyUsed,
}

/// Storage capability injected into the issuer and rotator.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a new refresh record. Fails with [`StoreError::Duplicate`] when
    /// the access token id is already taken.
    async fn save(&self, record: NewRefreshRecord) -> Result<RefreshRecord, StoreError>;

    /// Look up the record bound to an access token id.
    async fn find_by_access_token_id(
        &self,
        access_token_id: &str,
    ) -> Result<Option<RefreshRecord>, StoreError>;

    /// Atomically flip `used` from false to true. Must be a single conditional
    /// update, never a read followed by a write.
    async fn mark_used(&self, id: i64) -> Result<MarkUsedOutcome, StoreError>;
}

/// Run a store call under `limit`, mapping an elapsed deadline to [`StoreError::Timeout`].
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}
