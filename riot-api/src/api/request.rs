//! Outgoing call description and its fingerprint.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
pub use reqwest::Method;
use riftcall_shared::Route;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use urlencoding::encode;

/// Resource identifiers used for cache TTLs and endpoint bucketing.
pub mod resources {
    pub const ACCOUNT_V1: &str = "account-v1";
    pub const LEAGUE_V4: &str = "league-v4";
    pub const MATCH_V5: &str = "match-v5";
    pub const SPECTATOR_V5: &str = "spectator-v5";
    pub const STATUS_V4: &str = "lol-status-v4";
    pub const STATIC_DATA: &str = "static-data";
    pub const TOURNAMENT_STUB_V5: &str = "tournament-stub-v5";
}

/// Which of the configured API keys a call is issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApiKeyKind {
    #[default]
    Standard,
    Tournament,
    Tft,
}

/// Routing family of an endpoint, resolved against the client platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Routing {
    #[default]
    Platform,
    Regional,
}

/// A single call as described by an endpoint wrapper. Consumed by exactly
/// one pipeline execution.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub(crate) method: Method,
    pub(crate) resource: String,
    pub(crate) endpoint: String,
    pub(crate) path: String,
    pub(crate) routing: Routing,
    pub(crate) route_override: Option<Route>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<Bytes>,
    pub(crate) key: ApiKeyKind,
    pub(crate) timeout: Option<Duration>,
}

impl PipelineRequest {
    /// `endpoint` is the URL template (`/lol/match/v5/matches/{matchId}`),
    /// `path` the resolved one.
    pub fn new(
        method: Method,
        resource: impl Into<String>,
        endpoint: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method,
            resource: resource.into(),
            endpoint: endpoint.into(),
            path: path.into(),
            routing: Routing::default(),
            route_override: None,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            key: ApiKeyKind::default(),
            timeout: None,
        }
    }

    pub fn get(
        resource: impl Into<String>,
        endpoint: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::new(Method::GET, resource, endpoint, path)
    }

    pub fn post(
        resource: impl Into<String>,
        endpoint: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::new(Method::POST, resource, endpoint, path)
    }

    pub fn routing(mut self, routing: Routing) -> Self {
        self.routing = routing;
        self
    }

    /// Route this call to a fixed host regardless of the client platform.
    pub fn route_override(mut self, route: impl Into<Route>) -> Self {
        self.route_override = Some(route.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json_body<T: Serialize>(self, body: &T) -> Result<Self, serde_json::Error> {
        let raw = serde_json::to_vec(body)?;
        Ok(self
            .header("Content-Type", "application/json")
            .body(raw))
    }

    pub fn key(mut self, key: ApiKeyKind) -> Self {
        self.key = key;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Identifier of the endpoint used for method rate-limit bucketing.
    pub fn endpoint_id(&self) -> String {
        format!("{}:{}", self.resource, self.endpoint)
    }

    /// Path with the percent-encoded, sorted query string, without any API key.
    pub(crate) fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let mut pairs = self.query.clone();
        pairs.sort();
        let query = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// Deterministic digest of a resolved request, used as call-cache key.
///
/// Covers the method, the route, the path with its query and the body. The
/// API key is never part of it so one logical request shares its entry
/// across keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(request: &PipelineRequest, route: Route) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(request.method.as_str());
        hasher.update(b"\n");
        hasher.update(route.as_str());
        hasher.update(b"\n");
        hasher.update(request.path_and_query());
        hasher.update(b"\n");
        if let Some(body) = &request.body {
            hasher.update(body);
        }

        let digest = hasher.finalize();
        Self(hex::encode(&digest[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex digest of a body, shortened for fixture names and logs.
pub(crate) fn short_digest(raw: &[u8]) -> String {
    let digest = Sha256::digest(raw);
    hex::encode(&digest[..6])
}
