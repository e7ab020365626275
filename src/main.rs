use std::sync::Arc;

use riftcall_riot_api::{ApiKeyKind, MemoryStore, RiotClient, SystemClock, resources};
use riftcall_shared::Route;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;

mod config;
mod error;
mod logging;

#[tokio::main]
async fn main() {
    logging::init();

    info!("🐙 Starting...");

    if let Err(e) = run().await {
        error!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let store = Arc::new(MemoryStore::new(Arc::new(SystemClock)));
    let client = RiotClient::builder(config.riot_api_key)
        .platform(config.platform)
        .cache_calls(config.cache_calls)
        .cache_rate_limits(config.cache_rate_limits)
        .timeout(config.timeout)
        .pacing(config.riot_rate_limit_per_second)
        .store(store)
        .build()
        .await?;
    client.start_metrics_logging();

    let status = client.status_v4().get_platform_data().await?;
    if status.is_healthy() {
        info!("✅ {} ({}) is healthy", status.name, status.id);
    } else {
        warn!(
            maintenances = status.maintenances.len(),
            incidents = status.incidents.len(),
            "⚠️ {} ({}) reports issues",
            status.name,
            status.id
        );
    }

    let endpoint = format!(
        "{}:{}",
        resources::STATUS_V4,
        riftcall_riot_api::api::endpoints::status_v4::PLATFORM_DATA
    );
    let limits = client.current_limits(
        ApiKeyKind::Standard,
        Route::Platform(client.platform()),
        &endpoint,
    )?;
    info!("📊 rate limits: {}", serde_json::to_string(&limits)?);

    Ok(())
}
