use riftcall_riot_api::RiotApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Riot API error: {0}")]
    RiotApi(#[from] RiotApiError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
