use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use riftcall_shared::Platform;

use super::call_cache::CacheTtlTable;
use super::request::{ApiKeyKind, short_digest};
use crate::types::{RiotApiError, RiotApiResponse};

pub const KEY_HEADER: &str = "X-Riot-Token";
pub const KEY_QUERY_PARAM: &str = "api_key";

pub const RATE_LIMIT_STORE_KEY: &str = "riftcall.rate-limits";
pub const CALL_CACHE_STORE_KEY: &str = "riftcall.call-cache";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RATE_LIMIT_SAVE_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_CALL_CACHE_SAVE_TTL: Duration = Duration::from_secs(10 * 60);

/// Riot API key along with the identifier its rate limits are tracked under.
/// The identifier is a digest so persisted state never contains the key.
#[derive(Clone)]
pub struct ApiKey {
    secret: String,
    id: String,
}

impl ApiKey {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        let id = short_digest(secret.as_bytes());
        Self { secret, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Where the API key is put on outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyIncludeMode {
    #[default]
    Header,
    Query,
}

/// Validated client configuration, fixed for the lifetime of a client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub(crate) keys: HashMap<ApiKeyKind, ApiKey>,
    pub key_include_mode: KeyIncludeMode,
    pub platform: Platform,
    /// Send every call to this base instead of `https://{route}.api.riotgames.com`.
    pub base_url: Option<Url>,
    pub cache_calls: bool,
    pub cache_rate_limits: bool,
    pub cache_ttls: CacheTtlTable,
    pub rate_limit_save_ttl: Duration,
    pub call_cache_save_ttl: Duration,
    pub replay_dir: Option<PathBuf>,
    pub save_replay: bool,
    pub timeout: Duration,
    /// Optional local pacing of network calls, in requests per second.
    pub pacing: Option<NonZeroU32>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            keys: HashMap::new(),
            key_include_mode: KeyIncludeMode::default(),
            platform: Platform::EUW1,
            base_url: None,
            cache_calls: false,
            cache_rate_limits: false,
            cache_ttls: CacheTtlTable::default(),
            rate_limit_save_ttl: DEFAULT_RATE_LIMIT_SAVE_TTL,
            call_cache_save_ttl: DEFAULT_CALL_CACHE_SAVE_TTL,
            replay_dir: None,
            save_replay: false,
            timeout: DEFAULT_TIMEOUT,
            pacing: None,
        }
    }
}

impl ClientSettings {
    pub fn key(&self, kind: ApiKeyKind) -> RiotApiResponse<&ApiKey> {
        self.keys.get(&kind).ok_or_else(|| {
            RiotApiError::Configuration(format!("no API key configured for {:?} calls", kind))
        })
    }

    pub(crate) fn validate(&self) -> RiotApiResponse<()> {
        let standard = self.key(ApiKeyKind::Standard)?;
        for (kind, key) in &self.keys {
            if key.secret().trim().is_empty() || key.secret().contains(char::is_whitespace) {
                return Err(RiotApiError::Configuration(format!(
                    "the {:?} API key is empty or contains whitespace",
                    kind
                )));
            }
        }
        tracing::trace!("[RIOT::SETTINGS] standard key id {}", standard.id());

        if self.save_replay && self.replay_dir.is_none() {
            return Err(RiotApiError::Configuration(
                "recording replay data requires a replay directory".into(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(RiotApiError::Configuration(
                "the request timeout must be greater than zero".into(),
            ));
        }

        if let Some(base) = &self.base_url {
            if base.cannot_be_a_base() {
                return Err(RiotApiError::Configuration(format!(
                    "`{}` cannot be used as a base URL",
                    base
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> ClientSettings {
        let mut settings = ClientSettings::default();
        settings
            .keys
            .insert(ApiKeyKind::Standard, ApiKey::new("RGAPI-test"));
        settings
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("RGAPI-secret");
        let printed = format!("{:?}", key);
        assert!(!printed.contains("RGAPI-secret"));
        assert_eq!(key.id().len(), 12);
    }

    #[test]
    fn standard_key_is_required() {
        let err = ClientSettings::default().validate().unwrap_err();
        assert!(matches!(err, RiotApiError::Configuration(_)));
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn replay_recording_requires_a_directory() {
        let mut settings = with_key();
        settings.save_replay = true;
        assert!(matches!(
            settings.validate(),
            Err(RiotApiError::Configuration(_))
        ));
    }

    #[test]
    fn blank_keys_are_rejected() {
        let mut settings = with_key();
        settings.keys.insert(ApiKeyKind::Tft, ApiKey::new("  "));
        assert!(matches!(
            settings.validate(),
            Err(RiotApiError::Configuration(_))
        ));
    }
}
