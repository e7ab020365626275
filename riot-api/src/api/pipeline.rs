//! Execution core shared by the synchronous and the batched call modes.
//!
//! A call goes through, in order: URL and header resolution, before-call
//! hooks, response resolution (replay fixture, call cache, network),
//! classification of the status and after-call hooks. The request is
//! consumed by the call so no per-call state outlives it.

use std::sync::Arc;

use bytes::Bytes;
use governor::DefaultDirectRateLimiter;
use reqwest::{StatusCode, Url};
use riftcall_shared::{Platform, Route};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use super::call_cache::CallCacheControl;
use super::hooks::{AfterCallHook, BeforeCallHook, CallContext, CallReport};
use super::metrics::RequestMetrics;
use super::rate_limit::LIMIT_TYPE_HEADER;
use super::replay::ReplayFixtures;
use super::request::{Fingerprint, Method, PipelineRequest, Routing};
use super::settings::{ClientSettings, KEY_HEADER, KEY_QUERY_PARAM, KeyIncludeMode};
use super::transport::{HttpTransport, ResponseHeaders, TransportError, TransportRequest};
use crate::types::{RiotApiError, RiotApiResponse};

pub const DEPRECATION_HEADER: &str = "X-Riot-Deprecated";
pub const RETRY_AFTER_HEADER: &str = "Retry-After";

/// Where the response of a call came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Replay,
    Cache,
    Network,
}

/// Successful response of a single call, owned by the caller.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: Bytes,
    pub source: ResponseSource,
    pub fingerprint: Fingerprint,
}

impl CallOutcome {
    pub fn decode<T: DeserializeOwned>(&self) -> RiotApiResponse<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

struct Resolved {
    status: u16,
    headers: ResponseHeaders,
    body: Bytes,
    source: ResponseSource,
}

#[derive(Debug)]
pub struct Pipeline {
    settings: Arc<ClientSettings>,
    transport: Arc<dyn HttpTransport>,
    before: Vec<Arc<dyn BeforeCallHook>>,
    after: Vec<Arc<dyn AfterCallHook>>,
    cache: Option<Arc<CallCacheControl>>,
    replay: Option<ReplayFixtures>,
    pacing: Option<DefaultDirectRateLimiter>,
    metrics: Arc<RequestMetrics>,
}

impl Pipeline {
    pub fn new(
        settings: Arc<ClientSettings>,
        transport: Arc<dyn HttpTransport>,
        metrics: Arc<RequestMetrics>,
    ) -> Self {
        Self {
            settings,
            transport,
            before: Vec::new(),
            after: Vec::new(),
            cache: None,
            replay: None,
            pacing: None,
            metrics,
        }
    }

    pub fn before_call(mut self, hook: Arc<dyn BeforeCallHook>) -> Self {
        self.before.push(hook);
        self
    }

    pub fn after_call(mut self, hook: Arc<dyn AfterCallHook>) -> Self {
        self.after.push(hook);
        self
    }

    /// Serve GET calls from `cache` when an entry is live.
    pub fn with_cache(mut self, cache: Arc<CallCacheControl>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_replay(mut self, fixtures: ReplayFixtures) -> Self {
        self.replay = Some(fixtures);
        self
    }

    /// Wait on `limiter` before every network call.
    pub fn with_pacing(mut self, limiter: DefaultDirectRateLimiter) -> Self {
        self.pacing = Some(limiter);
        self
    }

    pub async fn execute(
        &self,
        platform: Platform,
        request: PipelineRequest,
    ) -> RiotApiResponse<CallOutcome> {
        let (transport_request, ctx) = self.resolve(platform, request)?;
        trace!(
            "[RIOT::PIPELINE] {} {} on {}",
            ctx.method, ctx.path_and_query, ctx.route
        );

        for hook in &self.before {
            hook.before_call(&ctx).await?;
        }

        let resolved = self.respond(&ctx, transport_request).await?;
        self.metrics.record(resolved.source);
        if let Some(sunset) = resolved.headers.get(DEPRECATION_HEADER) {
            warn!(
                "[RIOT::PIPELINE] {} is deprecated and will be removed at {}",
                ctx.endpoint, sunset
            );
        }

        let report = CallReport {
            status: resolved.status,
            headers: &resolved.headers,
            body: &resolved.body,
            source: resolved.source,
        };

        if let Err(err) = classify(resolved.status, &resolved.headers, &resolved.body) {
            if matches!(err, RiotApiError::ServerRateLimitExceeded { .. }) {
                warn!(
                    "[RIOT::PIPELINE] server refused {} on {}: {}",
                    ctx.endpoint, ctx.route, err
                );
            }
            for hook in self.after.iter().filter(|hook| hook.runs_on_failure()) {
                if let Err(hook_err) = hook.after_call(&ctx, &report).await {
                    warn!(
                        "[RIOT::PIPELINE] after-call hook failed on an error response: {}",
                        hook_err
                    );
                }
            }
            return Err(err);
        }

        for hook in &self.after {
            hook.after_call(&ctx, &report).await?;
        }

        Ok(CallOutcome {
            status: resolved.status,
            headers: resolved.headers,
            body: resolved.body,
            source: resolved.source,
            fingerprint: ctx.fingerprint,
        })
    }

    fn resolve(
        &self,
        platform: Platform,
        request: PipelineRequest,
    ) -> RiotApiResponse<(TransportRequest, CallContext)> {
        let key = self.settings.key(request.key)?;
        let route = request.route_override.unwrap_or(match request.routing {
            Routing::Platform => Route::Platform(platform),
            Routing::Regional => Route::Regional(platform.to_region()),
        });

        let base = match &self.settings.base_url {
            Some(base) => base.as_str().trim_end_matches('/').to_string(),
            None => route.base_url(),
        };
        let mut url = Url::parse(&format!("{}{}", base, request.path)).map_err(|e| {
            RiotApiError::Configuration(format!("invalid URL for {}: {}", request.path, e))
        })?;

        let mut headers = request.headers.clone();
        match self.settings.key_include_mode {
            KeyIncludeMode::Header => headers.push((KEY_HEADER.to_string(), key.secret().to_string())),
            KeyIncludeMode::Query => {
                url.query_pairs_mut()
                    .append_pair(KEY_QUERY_PARAM, key.secret());
            }
        }
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
        }

        let path_and_query = request.path_and_query();
        let replay_path = self.replay.as_ref().map(|fixtures| {
            fixtures.path_for(&request.method, &path_and_query, request.body.as_deref())
        });

        let ctx = CallContext {
            method: request.method.clone(),
            resource: request.resource.clone(),
            endpoint: request.endpoint_id(),
            route,
            key_id: key.id().to_string(),
            fingerprint: Fingerprint::of(&request, route),
            path_and_query,
            replay_path,
        };

        let transport_request = TransportRequest {
            method: request.method,
            url,
            headers,
            body: request.body,
            timeout: request.timeout.unwrap_or(self.settings.timeout),
        };

        Ok((transport_request, ctx))
    }

    async fn respond(
        &self,
        ctx: &CallContext,
        request: TransportRequest,
    ) -> RiotApiResponse<Resolved> {
        if let (Some(fixtures), Some(path)) = (&self.replay, &ctx.replay_path) {
            match fixtures.load(path).await? {
                Some(recorded) => {
                    debug!("[RIOT::REPLAY] serving {}", path.display());
                    return Ok(Resolved {
                        status: recorded.status,
                        body: recorded.body_bytes(),
                        headers: recorded.headers,
                        source: ResponseSource::Replay,
                    });
                }
                None if !self.settings.save_replay => {
                    return Err(RiotApiError::ReplayDataMissing { path: path.clone() });
                }
                None => {}
            }
        }

        if let Some(cache) = self.cache.as_ref().filter(|_| ctx.method == Method::GET) {
            if let Some(body) = cache.load_call_data(&ctx.fingerprint) {
                debug!(
                    "[RIOT::CALL_CACHE] serving {} ({})",
                    ctx.path_and_query, ctx.fingerprint
                );
                return Ok(Resolved {
                    status: StatusCode::OK.as_u16(),
                    headers: ResponseHeaders::default(),
                    body,
                    source: ResponseSource::Cache,
                });
            }
        }

        if let Some(pacing) = &self.pacing {
            pacing.until_ready().await;
        }

        let timeout = request.timeout;
        let response = tokio::time::timeout(timeout, self.transport.send(request))
            .await
            .map_err(|_| TransportError::Timeout(timeout))??;

        Ok(Resolved {
            status: response.status,
            headers: response.headers,
            body: response.body,
            source: ResponseSource::Network,
        })
    }
}

/// Map a response status to success or to the matching error.
pub fn classify(status: u16, headers: &ResponseHeaders, body: &[u8]) -> RiotApiResponse<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let message = server_message(status, body);
    Err(match status {
        400 => RiotApiError::BadRequest { message },
        401 => RiotApiError::Unauthorized { message },
        403 => RiotApiError::Forbidden { message },
        404 => RiotApiError::DataNotFound { message },
        415 => RiotApiError::UnsupportedMediaType { message },
        429 => RiotApiError::ServerRateLimitExceeded {
            message,
            limit_type: headers
                .get(LIMIT_TYPE_HEADER)
                .unwrap_or("unknown")
                .to_string(),
            retry_after: headers
                .get(RETRY_AFTER_HEADER)
                .and_then(|value| value.trim().parse().ok()),
        },
        500 => RiotApiError::InternalServerError { message },
        503 => RiotApiError::ServiceUnavailable { message },
        500..=599 => RiotApiError::Server { status, message },
        _ => RiotApiError::Request { status, message },
    })
}

/// Message from a `{"status":{"message":..}}` error body, falling back to the
/// raw body and then to the canonical reason of the status.
fn server_message(status: u16, body: &[u8]) -> String {
    let from_json = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/status/message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        });
    if let Some(message) = from_json {
        return message;
    }

    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    if !raw.is_empty() {
        return raw.chars().take(200).collect();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("no message")
        .to_string()
}
