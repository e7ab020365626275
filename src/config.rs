use std::env;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use riftcall_shared::Platform;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub platform: Platform,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub cache_calls: bool,
    pub cache_rate_limits: bool,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;
        const DEFAULT_TIMEOUT_SECS: u64 = 10;

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let platform = match env::var("RIOT_PLATFORM") {
            Ok(raw) => Platform::from_str(&raw).map_err(|e| AppError::Config(e.to_string()))?,
            Err(_) => Platform::EUW1,
        };

        let riot_rate_limit_per_second = env::var("RIOT_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_RIOT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        let timeout = env::var("RIOT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Ok(Self {
            riot_api_key,
            platform,
            riot_rate_limit_per_second,
            cache_calls: flag("RIOT_CACHE_CALLS", true),
            cache_rate_limits: flag("RIOT_CACHE_RATELIMIT", true),
            timeout,
        })
    }
}

fn flag(name: &str, default: bool) -> bool {
    match env::var(name).map(|v| v.to_ascii_lowercase()) {
        Ok(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Ok(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
