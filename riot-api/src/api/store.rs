//! In-process [`PersistentStore`], used by default and in tests.
//!
//! Sharing one `Arc<MemoryStore>` between clients behaves like a restart
//! against a durable backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use riftcall_shared::{StoreError, traits::PersistentStore};

use super::clock::Clock;

#[derive(Debug, Clone)]
struct StoredValue {
    value: Bytes,
    expires_at: u64,
}

#[derive(Debug, Default)]
struct Inner {
    committed: HashMap<String, StoredValue>,
    staged: Vec<(String, StoredValue)>,
}

#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock,
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of values staged and not committed yet.
    pub fn pending(&self) -> usize {
        self.inner().staged.len()
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let now = self.clock.now_millis();
        let mut inner = self.inner();
        match inner.committed.get(key) {
            Some(stored) if stored.expires_at > now => Ok(Some(stored.value.clone())),
            Some(_) => {
                inner.committed.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), StoreError> {
        let ttl = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let expires_at = self.clock.now_millis().saturating_add(ttl);
        self.inner()
            .staged
            .push((key.to_string(), StoredValue { value, expires_at }));
        Ok(())
    }

    async fn commit(&self) -> Result<(), StoreError> {
        let mut inner = self.inner();
        let staged = std::mem::take(&mut inner.staged);
        inner.committed.extend(staged);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner();
        inner.committed.clear();
        inner.staged.clear();
        Ok(())
    }
}
