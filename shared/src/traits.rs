use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::StoreError;

/// Key-value store with per-entry TTL used to keep client state across
/// process lifetimes.
///
/// Writes are deferred: a value passed to [`PersistentStore::set`] only has
/// to be durable once [`PersistentStore::commit`] returned.
#[async_trait]
pub trait PersistentStore: Send + Sync + Debug {
    /// Get a committed, non expired value.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Stage a value for the next commit.
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), StoreError>;

    /// Flush every staged value.
    async fn commit(&self) -> Result<(), StoreError>;

    /// Drop every committed and staged value.
    async fn clear(&self) -> Result<(), StoreError>;
}
