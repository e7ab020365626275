//! Local view of the application and method rate limits reported by the
//! server.
//!
//! The server is the only authority on window boundaries and on usage from
//! other processes sharing a key, so nothing is counted locally: limits and
//! counts are reconciled from the response headers after every call and the
//! admission decision is taken from that reconciled view.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use riftcall_shared::Route;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::clock::Clock;

pub const APP_LIMIT_HEADER: &str = "X-App-Rate-Limit";
pub const APP_COUNT_HEADER: &str = "X-App-Rate-Limit-Count";
pub const METHOD_LIMIT_HEADER: &str = "X-Method-Rate-Limit";
pub const METHOD_COUNT_HEADER: &str = "X-Method-Rate-Limit-Count";
pub const LIMIT_TYPE_HEADER: &str = "X-Rate-Limit-Type";

/// A single fixed window of a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitWindow {
    pub allowed: u32,
    pub used: u32,
    /// Unix milliseconds.
    pub resets_at: u64,
}

impl LimitWindow {
    fn new(allowed: u32, window_secs: u64, now: u64) -> Self {
        Self {
            allowed,
            used: 0,
            resets_at: now.saturating_add(window_secs.saturating_mul(1_000)),
        }
    }

    fn is_exhausted(&self, now: u64) -> bool {
        self.used >= self.allowed && self.resets_at > now
    }

    fn roll_over(&mut self, window_secs: u64, now: u64) {
        if self.resets_at <= now {
            self.used = 0;
            self.resets_at = now.saturating_add(window_secs.saturating_mul(1_000));
        }
    }
}

/// Windows of one limit keyed by their length in seconds.
pub type LimitSpec = BTreeMap<u64, LimitWindow>;

/// Snapshot of both limits applying to a call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitStatus {
    pub application: LimitSpec,
    pub method: LimitSpec,
}

/// Application limits are shared by every endpoint of a route, method limits
/// are tracked per endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct BucketKey {
    key_id: String,
    route: Route,
    endpoint: Option<String>,
}

impl BucketKey {
    fn application(key_id: &str, route: Route) -> Self {
        Self {
            key_id: key_id.to_string(),
            route,
            endpoint: None,
        }
    }

    fn method(key_id: &str, route: Route, endpoint: &str) -> Self {
        Self {
            key_id: key_id.to_string(),
            route,
            endpoint: Some(endpoint.to_string()),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    buckets: Vec<(BucketKey, LimitSpec)>,
}

#[derive(Debug)]
pub struct RateLimitControl {
    buckets: Mutex<HashMap<BucketKey, LimitSpec>>,
    clock: Arc<dyn Clock>,
}

impl RateLimitControl {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn buckets(&self) -> MutexGuard<'_, HashMap<BucketKey, LimitSpec>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a call can be issued without being rejected by the server.
    ///
    /// Keys never observed so far are always allowed: the limits are only
    /// known once a first response revealed them.
    pub fn can_call(&self, key_id: &str, route: Route, endpoint: &str) -> bool {
        let now = self.clock.now_millis();
        let buckets = self.buckets();

        [
            BucketKey::application(key_id, route),
            BucketKey::method(key_id, route, endpoint),
        ]
        .iter()
        .filter_map(|key| buckets.get(key))
        .flat_map(|spec| spec.values())
        .all(|window| !window.is_exhausted(now))
    }

    /// Reconcile the allowed counts from `count:window,...` limit headers.
    pub fn register_limits(
        &self,
        key_id: &str,
        route: Route,
        endpoint: &str,
        app_header: Option<&str>,
        method_header: Option<&str>,
    ) {
        let now = self.clock.now_millis();
        let mut buckets = self.buckets();

        let updates = [
            (BucketKey::application(key_id, route), app_header),
            (BucketKey::method(key_id, route, endpoint), method_header),
        ];
        for (key, header) in updates {
            let Some(header) = header else { continue };
            let spec = buckets.entry(key).or_default();
            for (window_secs, allowed) in parse_limit_header(header) {
                let window = spec
                    .entry(window_secs)
                    .or_insert_with(|| LimitWindow::new(allowed, window_secs, now));
                window.allowed = allowed;
                window.roll_over(window_secs, now);
            }
        }
    }

    /// Reconcile the used counts from `used:window,...` count headers.
    ///
    /// Counts for windows whose limit was never observed are ignored.
    pub fn register_call(
        &self,
        key_id: &str,
        route: Route,
        endpoint: &str,
        app_count_header: Option<&str>,
        method_count_header: Option<&str>,
    ) {
        let now = self.clock.now_millis();
        let mut buckets = self.buckets();

        let updates = [
            (BucketKey::application(key_id, route), app_count_header),
            (BucketKey::method(key_id, route, endpoint), method_count_header),
        ];
        for (key, header) in updates {
            let Some(header) = header else { continue };
            let Some(spec) = buckets.get_mut(&key) else {
                tracing::trace!(
                    "[RIOT::RATE_LIMIT] count header without known limit for {:?}",
                    key
                );
                continue;
            };
            for (window_secs, used) in parse_limit_header(header) {
                if let Some(window) = spec.get_mut(&window_secs) {
                    window.roll_over(window_secs, now);
                    window.used = used;
                }
            }
        }
    }

    pub fn current_status(&self, key_id: &str, route: Route, endpoint: &str) -> LimitStatus {
        let buckets = self.buckets();
        LimitStatus {
            application: buckets
                .get(&BucketKey::application(key_id, route))
                .cloned()
                .unwrap_or_default(),
            method: buckets
                .get(&BucketKey::method(key_id, route, endpoint))
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn clear(&self) {
        self.buckets().clear();
    }

    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        let snapshot = Snapshot {
            buckets: self
                .buckets()
                .iter()
                .map(|(key, spec)| (key.clone(), spec.clone()))
                .collect(),
        };
        serde_json::to_vec(&snapshot).map(Bytes::from)
    }

    /// Replace the tracked state with a previously persisted one.
    pub fn restore(&self, raw: &[u8]) -> Result<(), serde_json::Error> {
        let snapshot: Snapshot = serde_json::from_slice(raw)?;
        *self.buckets() = snapshot.buckets.into_iter().collect();
        Ok(())
    }
}

/// Parse a `count:window,count:window` rate-limit header into a map of
/// window length (seconds) to count. Malformed pairs are skipped.
pub fn parse_limit_header(header: &str) -> BTreeMap<u64, u32> {
    header
        .split(',')
        .filter(|pair| !pair.trim().is_empty())
        .filter_map(|pair| {
            let parsed = pair.trim().split_once(':').and_then(|(count, window)| {
                Some((window.trim().parse().ok()?, count.trim().parse().ok()?))
            });
            if parsed.is_none() {
                warn!("[RIOT::RATE_LIMIT] ignoring malformed limit pair `{}`", pair);
            }
            parsed
        })
        .collect()
}
