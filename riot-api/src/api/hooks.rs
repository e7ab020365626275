//! Ordered hooks run around every pipeline call.
//!
//! Before-call hooks may reject a call before any I/O happens. After-call
//! hooks see the response; only the ones reporting [`AfterCallHook::runs_on_failure`]
//! run when the server answered with an error status.

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use riftcall_shared::{Route, StoreError, traits::PersistentStore};
use tracing::{debug, warn};

use super::call_cache::{CacheTtlTable, CallCacheControl};
use super::metrics::RequestMetrics;
use super::pipeline::ResponseSource;
use super::rate_limit::{
    APP_COUNT_HEADER, APP_LIMIT_HEADER, METHOD_COUNT_HEADER, METHOD_LIMIT_HEADER,
    RateLimitControl,
};
use super::replay::{RecordedResponse, ReplayFixtures};
use super::request::{Fingerprint, Method};
use super::settings::{CALL_CACHE_STORE_KEY, RATE_LIMIT_STORE_KEY};
use super::transport::ResponseHeaders;
use crate::types::{RiotApiError, RiotApiResponse};

/// Immutable description of the call a hook runs for.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub method: Method,
    pub resource: String,
    /// Endpoint identifier, see [`super::request::PipelineRequest::endpoint_id`].
    pub endpoint: String,
    pub route: Route,
    pub key_id: String,
    pub fingerprint: Fingerprint,
    /// Path and query without the API key.
    pub path_and_query: String,
    pub replay_path: Option<PathBuf>,
}

/// Response as seen by after-call hooks.
#[derive(Debug)]
pub struct CallReport<'a> {
    pub status: u16,
    pub headers: &'a ResponseHeaders,
    pub body: &'a Bytes,
    pub source: ResponseSource,
}

impl CallReport<'_> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn is_live(&self) -> bool {
        self.source == ResponseSource::Network
    }
}

#[async_trait]
pub trait BeforeCallHook: Send + Sync + Debug {
    /// An error aborts the call.
    async fn before_call(&self, ctx: &CallContext) -> RiotApiResponse<()>;
}

#[async_trait]
pub trait AfterCallHook: Send + Sync + Debug {
    async fn after_call(&self, ctx: &CallContext, report: &CallReport<'_>) -> RiotApiResponse<()>;

    fn runs_on_failure(&self) -> bool {
        false
    }
}

/// Refuses calls the tracked rate limits predict the server would reject.
#[derive(Debug)]
pub struct AdmissionControl {
    limits: Arc<RateLimitControl>,
    metrics: Arc<RequestMetrics>,
}

impl AdmissionControl {
    pub fn new(limits: Arc<RateLimitControl>, metrics: Arc<RequestMetrics>) -> Self {
        Self { limits, metrics }
    }
}

#[async_trait]
impl BeforeCallHook for AdmissionControl {
    async fn before_call(&self, ctx: &CallContext) -> RiotApiResponse<()> {
        if self.limits.can_call(&ctx.key_id, ctx.route, &ctx.endpoint) {
            return Ok(());
        }

        self.metrics.reject();
        warn!(
            "[RIOT::PIPELINE] {} on {} refused, rate limit exhausted",
            ctx.endpoint, ctx.route
        );
        Err(RiotApiError::ClientRateLimitExceeded {
            route: ctx.route.to_string(),
            endpoint: ctx.endpoint.clone(),
        })
    }
}

#[derive(Debug)]
pub struct RegisterLimits(pub Arc<RateLimitControl>);

#[async_trait]
impl AfterCallHook for RegisterLimits {
    async fn after_call(&self, ctx: &CallContext, report: &CallReport<'_>) -> RiotApiResponse<()> {
        if report.is_live() {
            self.0.register_limits(
                &ctx.key_id,
                ctx.route,
                &ctx.endpoint,
                report.headers.get(APP_LIMIT_HEADER),
                report.headers.get(METHOD_LIMIT_HEADER),
            );
        }
        Ok(())
    }

    fn runs_on_failure(&self) -> bool {
        true
    }
}

#[derive(Debug)]
pub struct RegisterCall(pub Arc<RateLimitControl>);

#[async_trait]
impl AfterCallHook for RegisterCall {
    async fn after_call(&self, ctx: &CallContext, report: &CallReport<'_>) -> RiotApiResponse<()> {
        if report.is_live() {
            self.0.register_call(
                &ctx.key_id,
                ctx.route,
                &ctx.endpoint,
                report.headers.get(APP_COUNT_HEADER),
                report.headers.get(METHOD_COUNT_HEADER),
            );
        }
        Ok(())
    }

    fn runs_on_failure(&self) -> bool {
        true
    }
}

/// Keeps successful live bodies for the TTL of their resource.
#[derive(Debug)]
pub struct SaveCallCache {
    cache: Arc<CallCacheControl>,
    ttls: CacheTtlTable,
}

impl SaveCallCache {
    pub fn new(cache: Arc<CallCacheControl>, ttls: CacheTtlTable) -> Self {
        Self { cache, ttls }
    }
}

#[async_trait]
impl AfterCallHook for SaveCallCache {
    async fn after_call(&self, ctx: &CallContext, report: &CallReport<'_>) -> RiotApiResponse<()> {
        if !report.is_live() || !report.is_success() || ctx.method != Method::GET {
            return Ok(());
        }

        let ttl = self.ttls.ttl_for(&ctx.resource);
        if self
            .cache
            .save_call_data(&ctx.fingerprint, report.body.clone(), ttl)
        {
            debug!(
                "[RIOT::CALL_CACHE] cached {} for {:?} ({})",
                ctx.path_and_query, ttl, ctx.fingerprint
            );
        }
        Ok(())
    }
}

/// Records live responses as replay fixtures when none exists yet.
#[derive(Debug)]
pub struct SaveReplay(pub ReplayFixtures);

#[async_trait]
impl AfterCallHook for SaveReplay {
    async fn after_call(&self, ctx: &CallContext, report: &CallReport<'_>) -> RiotApiResponse<()> {
        let Some(path) = &ctx.replay_path else {
            return Ok(());
        };
        if !report.is_live() || !report.is_success() || self.0.exists(path).await {
            return Ok(());
        }

        let Ok(body) = std::str::from_utf8(report.body) else {
            warn!(
                "[RIOT::REPLAY] {} returned a non UTF-8 body, not recorded",
                ctx.path_and_query
            );
            return Ok(());
        };

        let recorded = RecordedResponse {
            status: report.status,
            headers: report.headers.clone(),
            body: body.to_string(),
        };
        self.0.save(path, &recorded).await?;
        debug!("[RIOT::REPLAY] recorded {}", path.display());
        Ok(())
    }
}

/// Writes the rate-limit and call-cache state back to the store and commits.
#[derive(Debug)]
pub struct PersistState {
    store: Arc<dyn PersistentStore>,
    limits: Option<(Arc<RateLimitControl>, Duration)>,
    cache: Option<(Arc<CallCacheControl>, Duration)>,
}

impl PersistState {
    pub fn new(
        store: Arc<dyn PersistentStore>,
        limits: Option<(Arc<RateLimitControl>, Duration)>,
        cache: Option<(Arc<CallCacheControl>, Duration)>,
    ) -> Self {
        Self {
            store,
            limits,
            cache,
        }
    }
}

#[async_trait]
impl AfterCallHook for PersistState {
    async fn after_call(&self, _ctx: &CallContext, _report: &CallReport<'_>) -> RiotApiResponse<()> {
        if let Some((limits, ttl)) = &self.limits {
            self.store
                .set(RATE_LIMIT_STORE_KEY, limits.to_bytes().map_err(encoding)?, *ttl)
                .await?;
        }
        if let Some((cache, ttl)) = &self.cache {
            self.store
                .set(CALL_CACHE_STORE_KEY, cache.to_bytes().map_err(encoding)?, *ttl)
                .await?;
        }
        self.store.commit().await?;
        Ok(())
    }

    fn runs_on_failure(&self) -> bool {
        true
    }
}

fn encoding(error: serde_json::Error) -> StoreError {
    StoreError::Encoding(error.to_string())
}
