use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use futures::future::join_all;
use governor::{Quota, RateLimiter};
use reqwest::Url;
use riftcall_shared::{Platform, Route, StoreError, traits::PersistentStore};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::batch::{BatchHandle, BatchQueue, BatchSummary};
use super::call_cache::CallCacheControl;
use super::clock::{Clock, SystemClock};
use super::hooks::{
    AdmissionControl, AfterCallHook, BeforeCallHook, PersistState, RegisterCall, RegisterLimits,
    SaveCallCache, SaveReplay,
};
use super::metrics::RequestMetrics;
use super::pipeline::{CallOutcome, Pipeline};
use super::rate_limit::{LimitStatus, RateLimitControl};
use super::replay::ReplayFixtures;
use super::request::{ApiKeyKind, PipelineRequest};
use super::settings::{
    ApiKey, CALL_CACHE_STORE_KEY, ClientSettings, KeyIncludeMode, RATE_LIMIT_STORE_KEY,
};
use super::transport::{HttpTransport, ReqwestTransport};
use crate::types::{RiotApiError, RiotApiResponse};

/// Riot API client. Every endpoint wrapper is a thin layer over
/// [`RiotClient::execute`].
#[derive(Debug)]
pub struct RiotClient {
    platform: RwLock<Platform>,
    settings: Arc<ClientSettings>,
    pipeline: Pipeline,
    limits: Arc<RateLimitControl>,
    cache: Arc<CallCacheControl>,
    store: Option<Arc<dyn PersistentStore>>,
    batches: BatchQueue,
    metrics: Arc<RequestMetrics>,
}

impl RiotClient {
    pub fn builder(api_key: impl Into<String>) -> RiotClientBuilder {
        RiotClientBuilder::new(api_key)
    }

    pub fn platform(&self) -> Platform {
        *self.platform.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_platform(&self, platform: Platform) {
        *self.platform.write().unwrap_or_else(PoisonError::into_inner) = platform;
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Run a call through the pipeline and return the raw response.
    pub async fn execute_raw(&self, request: PipelineRequest) -> RiotApiResponse<CallOutcome> {
        self.pipeline.execute(self.platform(), request).await
    }

    /// Run a call through the pipeline and decode its JSON body.
    pub async fn execute<T: DeserializeOwned>(&self, request: PipelineRequest) -> RiotApiResponse<T> {
        self.execute_raw(request).await?.decode()
    }

    /// Defer a call into `batch`. The call is only dispatched by
    /// [`RiotClient::commit`] of the same batch, and exactly one of the
    /// callbacks fires once it settled.
    pub fn enqueue<T, S, F>(
        &self,
        batch: &str,
        request: PipelineRequest,
        on_success: S,
        on_failure: F,
    ) -> BatchHandle
    where
        T: DeserializeOwned + Send + 'static,
        S: FnOnce(T) + Send + 'static,
        F: FnOnce(RiotApiError) + Send + 'static,
    {
        let settle = Box::new(move |result: RiotApiResponse<CallOutcome>| {
            match result.and_then(|outcome| outcome.decode::<T>()) {
                Ok(decoded) => {
                    on_success(decoded);
                    true
                }
                Err(err) => {
                    on_failure(err);
                    false
                }
            }
        });
        self.batches.push(batch, request, settle)
    }

    /// Dispatch every call enqueued under `batch` and wait until all settled.
    pub async fn commit(&self, batch: &str) -> BatchSummary {
        let calls = self.batches.take(batch);
        tracing::trace!("[RIOT::CLIENT] committing {} call(s) of batch {}", calls.len(), batch);

        let settled = join_all(calls.into_iter().map(|call| async move {
            let result = self.pipeline.execute(self.platform(), call.request).await;
            (call.settle)(result)
        }))
        .await;

        settled
            .into_iter()
            .fold(BatchSummary::default(), |mut summary, succeeded| {
                if succeeded {
                    summary.succeeded += 1;
                } else {
                    summary.failed += 1;
                }
                summary
            })
    }

    /// Calls waiting for their batch to be committed.
    pub fn pending(&self, batch: &str) -> usize {
        self.batches.pending(batch)
    }

    /// Limits currently tracked for `endpoint` (see [`PipelineRequest::endpoint_id`]).
    pub fn current_limits(
        &self,
        key: ApiKeyKind,
        route: Route,
        endpoint: &str,
    ) -> RiotApiResponse<LimitStatus> {
        let key = self.settings.key(key)?;
        Ok(self.limits.current_status(key.id(), route, endpoint))
    }

    /// Drop tracked rate limits, cached calls and everything persisted.
    pub async fn clear_cache(&self) -> RiotApiResponse<()> {
        self.limits.clear();
        self.cache.clear();
        if let Some(store) = &self.store {
            store.clear().await?;
        }
        info!("[RIOT::CLIENT] rate limits and call cache cleared");
        Ok(())
    }

    pub fn metrics(&self) -> Arc<RequestMetrics> {
        self.metrics.clone()
    }

    /// Spawn a task logging periodic metrics about requests.
    pub fn start_metrics_logging(&self) {
        let metrics = self.metrics.clone();
        tokio::spawn(async move { metrics.log_loop().await });
    }
}

/// Collects the settings and collaborators of a [`RiotClient`]. Everything
/// is validated by [`RiotClientBuilder::build`].
pub struct RiotClientBuilder {
    settings: ClientSettings,
    base_url: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    store: Option<Arc<dyn PersistentStore>>,
    clock: Arc<dyn Clock>,
    before: Vec<Arc<dyn BeforeCallHook>>,
    after: Vec<Arc<dyn AfterCallHook>>,
    name: &'static str,
}

impl RiotClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        let mut settings = ClientSettings::default();
        settings
            .keys
            .insert(ApiKeyKind::Standard, ApiKey::new(api_key));

        Self {
            settings,
            base_url: None,
            transport: None,
            store: None,
            clock: Arc::new(SystemClock),
            before: Vec::new(),
            after: Vec::new(),
            name: "riot",
        }
    }

    pub fn key(mut self, kind: ApiKeyKind, api_key: impl Into<String>) -> Self {
        self.settings.keys.insert(kind, ApiKey::new(api_key));
        self
    }

    pub fn key_include_mode(mut self, mode: KeyIncludeMode) -> Self {
        self.settings.key_include_mode = mode;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.settings.platform = platform;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn cache_calls(mut self, enabled: bool) -> Self {
        self.settings.cache_calls = enabled;
        self
    }

    /// Persist rate-limit state into the store, requires [`RiotClientBuilder::store`].
    pub fn cache_rate_limits(mut self, enabled: bool) -> Self {
        self.settings.cache_rate_limits = enabled;
        self
    }

    pub fn default_cache_ttl(mut self, ttl: Duration) -> Self {
        self.settings.cache_ttls = self.settings.cache_ttls.with_default(ttl);
        self
    }

    pub fn resource_cache_ttl(mut self, resource: impl Into<String>, ttl: Duration) -> Self {
        self.settings.cache_ttls.set(resource, ttl);
        self
    }

    pub fn rate_limit_save_ttl(mut self, ttl: Duration) -> Self {
        self.settings.rate_limit_save_ttl = ttl;
        self
    }

    pub fn call_cache_save_ttl(mut self, ttl: Duration) -> Self {
        self.settings.call_cache_save_ttl = ttl;
        self
    }

    /// Serve calls from the fixtures in `dir`.
    pub fn replay_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings.replay_dir = Some(dir.into());
        self
    }

    /// Record live responses missing from the replay directory.
    pub fn save_replay(mut self, enabled: bool) -> Self {
        self.settings.save_replay = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    pub fn pacing(mut self, per_second: NonZeroU32) -> Self {
        self.settings.pacing = Some(per_second);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn store(mut self, store: Arc<dyn PersistentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run after the built-in admission control.
    pub fn before_call(mut self, hook: Arc<dyn BeforeCallHook>) -> Self {
        self.before.push(hook);
        self
    }

    /// Run after the built-in bookkeeping, before the store commit.
    pub fn after_call(mut self, hook: Arc<dyn AfterCallHook>) -> Self {
        self.after.push(hook);
        self
    }

    /// Name the metrics of this client are logged under.
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub async fn build(mut self) -> RiotApiResponse<RiotClient> {
        if let Some(raw) = &self.base_url {
            let url = Url::parse(raw).map_err(|e| {
                RiotApiError::Configuration(format!("invalid base URL `{}`: {}", raw, e))
            })?;
            self.settings.base_url = Some(url);
        }
        self.settings.validate()?;
        if self.settings.cache_rate_limits && self.store.is_none() {
            return Err(RiotApiError::Configuration(
                "caching rate limits requires a persistent store".into(),
            ));
        }

        let settings = Arc::new(self.settings);
        let metrics = RequestMetrics::new(self.name);
        let limits = Arc::new(RateLimitControl::new(self.clock.clone()));
        let cache = Arc::new(CallCacheControl::new(self.clock.clone()));

        if let Some(store) = &self.store {
            load_state(store.as_ref(), &settings, &limits, &cache).await?;
        }

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::default()));
        let mut pipeline = Pipeline::new(settings.clone(), transport, metrics.clone())
            .before_call(Arc::new(AdmissionControl::new(
                limits.clone(),
                metrics.clone(),
            )));
        for hook in self.before {
            pipeline = pipeline.before_call(hook);
        }

        pipeline = pipeline
            .after_call(Arc::new(RegisterLimits(limits.clone())))
            .after_call(Arc::new(RegisterCall(limits.clone())));
        if settings.cache_calls {
            pipeline = pipeline.with_cache(cache.clone()).after_call(Arc::new(
                SaveCallCache::new(cache.clone(), settings.cache_ttls.clone()),
            ));
        }
        if let Some(dir) = &settings.replay_dir {
            let fixtures = ReplayFixtures::new(dir);
            pipeline = pipeline.with_replay(fixtures.clone());
            if settings.save_replay {
                pipeline = pipeline.after_call(Arc::new(SaveReplay(fixtures)));
            }
        }
        for hook in self.after {
            pipeline = pipeline.after_call(hook);
        }
        if let Some(store) = &self.store {
            if settings.cache_rate_limits || settings.cache_calls {
                pipeline = pipeline.after_call(Arc::new(PersistState::new(
                    store.clone(),
                    settings
                        .cache_rate_limits
                        .then(|| (limits.clone(), settings.rate_limit_save_ttl)),
                    settings
                        .cache_calls
                        .then(|| (cache.clone(), settings.call_cache_save_ttl)),
                )));
            }
        }
        if let Some(per_second) = settings.pacing {
            pipeline = pipeline.with_pacing(RateLimiter::direct(Quota::per_second(per_second)));
        }

        info!(
            "[RIOT::CLIENT] client ready on {} (call cache: {}, rate-limit cache: {})",
            settings.platform, settings.cache_calls, settings.cache_rate_limits
        );

        Ok(RiotClient {
            platform: RwLock::new(settings.platform),
            settings,
            pipeline,
            limits,
            cache,
            store: self.store,
            batches: BatchQueue::default(),
            metrics,
        })
    }
}

/// Restore the controls persisted by a previous client. Unreadable state is
/// dropped with a warning.
async fn load_state(
    store: &dyn PersistentStore,
    settings: &ClientSettings,
    limits: &RateLimitControl,
    cache: &CallCacheControl,
) -> RiotApiResponse<()> {
    if settings.cache_rate_limits {
        if let Some(raw) = store.get(RATE_LIMIT_STORE_KEY).await? {
            if let Err(e) = limits
                .restore(&raw)
                .map_err(|e| decoding(RATE_LIMIT_STORE_KEY, e))
            {
                warn!("[RIOT::CLIENT] dropping persisted rate limits: {}", e);
            }
        }
    }
    if settings.cache_calls {
        if let Some(raw) = store.get(CALL_CACHE_STORE_KEY).await? {
            if let Err(e) = cache
                .restore(&raw)
                .map_err(|e| decoding(CALL_CACHE_STORE_KEY, e))
            {
                warn!("[RIOT::CLIENT] dropping persisted call cache: {}", e);
            }
        }
    }
    Ok(())
}

fn decoding(key: &str, error: serde_json::Error) -> StoreError {
    StoreError::Decoding {
        key: key.to_string(),
        reason: error.to_string(),
    }
}
