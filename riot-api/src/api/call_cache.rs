//! Cache of raw response bodies keyed by request fingerprint.
//!
//! The first successful write of a fingerprint wins until its TTL elapsed;
//! later saves of the same fingerprint are refused.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::request::{Fingerprint, resources};

#[derive(Debug, Clone)]
struct CachedCall {
    body: Bytes,
    expires_at: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCall {
    fingerprint: Fingerprint,
    body: String,
    expires_at: u64,
}

#[derive(Debug)]
pub struct CallCacheControl {
    entries: Mutex<HashMap<Fingerprint, CachedCall>>,
    clock: Arc<dyn Clock>,
}

impl CallCacheControl {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Fingerprint, CachedCall>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Expired entries are evicted on lookup.
    pub fn is_call_cached(&self, fingerprint: &Fingerprint) -> bool {
        let now = self.clock.now_millis();
        let mut entries = self.entries();
        match entries.get(fingerprint) {
            Some(entry) if entry.expires_at > now => true,
            Some(_) => {
                entries.remove(fingerprint);
                false
            }
            None => false,
        }
    }

    /// Store `body` for `ttl`. Returns `false` when a live entry already
    /// exists or when the TTL is zero. Every expired entry is dropped.
    pub fn save_call_data(&self, fingerprint: &Fingerprint, body: Bytes, ttl: Duration) -> bool {
        if ttl.is_zero() {
            return false;
        }

        let now = self.clock.now_millis();
        let mut entries = self.entries();
        entries.retain(|_, entry| entry.expires_at > now);
        if entries.contains_key(fingerprint) {
            return false;
        }

        let ttl = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        entries.insert(
            fingerprint.clone(),
            CachedCall {
                body,
                expires_at: now.saturating_add(ttl),
            },
        );
        true
    }

    /// Expired entries are evicted on lookup.
    pub fn load_call_data(&self, fingerprint: &Fingerprint) -> Option<Bytes> {
        let now = self.clock.now_millis();
        let mut entries = self.entries();
        match entries.get(fingerprint) {
            Some(entry) if entry.expires_at > now => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(fingerprint);
                None
            }
            None => None,
        }
    }

    /// Returns whether anything was dropped.
    pub fn clear(&self) -> bool {
        let mut entries = self.entries();
        let had_entries = !entries.is_empty();
        entries.clear();
        had_entries
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize live entries only, dropping the expired ones.
    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        let now = self.clock.now_millis();
        let mut entries = self.entries();
        entries.retain(|_, entry| entry.expires_at > now);
        let persisted: Vec<PersistedCall> = entries
            .iter()
            .map(|(fingerprint, entry)| PersistedCall {
                fingerprint: fingerprint.clone(),
                body: STANDARD.encode(&entry.body),
                expires_at: entry.expires_at,
            })
            .collect();
        serde_json::to_vec(&persisted).map(Bytes::from)
    }

    /// Replace the cached calls with a previously persisted set.
    /// Entries whose body cannot be decoded are dropped.
    pub fn restore(&self, raw: &[u8]) -> Result<(), serde_json::Error> {
        let persisted: Vec<PersistedCall> = serde_json::from_slice(raw)?;
        let restored = persisted
            .into_iter()
            .filter_map(|call| {
                let body = STANDARD.decode(call.body).ok()?;
                Some((
                    call.fingerprint,
                    CachedCall {
                        body: Bytes::from(body),
                        expires_at: call.expires_at,
                    },
                ))
            })
            .collect();
        *self.entries() = restored;
        Ok(())
    }
}

/// Time-to-live of cached calls per resource.
#[derive(Debug, Clone)]
pub struct CacheTtlTable {
    default: Duration,
    per_resource: HashMap<String, Duration>,
}

impl Default for CacheTtlTable {
    fn default() -> Self {
        let per_resource = [
            (resources::SPECTATOR_V5, Duration::ZERO),
            (resources::STATUS_V4, Duration::ZERO),
            (resources::TOURNAMENT_STUB_V5, Duration::ZERO),
            (resources::STATIC_DATA, Duration::from_secs(24 * 60 * 60)),
            (resources::MATCH_V5, Duration::from_secs(60 * 60)),
        ]
        .into_iter()
        .map(|(resource, ttl)| (resource.to_string(), ttl))
        .collect();

        Self {
            default: Duration::from_secs(60),
            per_resource,
        }
    }
}

impl CacheTtlTable {
    pub fn with_default(mut self, ttl: Duration) -> Self {
        self.default = ttl;
        self
    }

    pub fn set(&mut self, resource: impl Into<String>, ttl: Duration) {
        self.per_resource.insert(resource.into(), ttl);
    }

    /// A zero TTL disables caching for the resource.
    pub fn ttl_for(&self, resource: &str) -> Duration {
        self.per_resource
            .get(resource)
            .copied()
            .unwrap_or(self.default)
    }
}
