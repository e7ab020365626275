use std::path::PathBuf;

use riftcall_shared::StoreError;
use thiserror::Error;

use crate::api::transport::TransportError;

/// Every way a pipeline call can fail.
#[derive(Debug, Error)]
pub enum RiotApiError {
    #[error("Rate limit would be exceeded by calling {endpoint} on {route}, call aborted")]
    ClientRateLimitExceeded { route: String, endpoint: String },

    #[error("HTTP 400 Bad request: {message}")]
    BadRequest { message: String },

    #[error("HTTP 401 Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("HTTP 403 Forbidden: {message}")]
    Forbidden { message: String },

    #[error("HTTP 404 Data not found: {message}")]
    DataNotFound { message: String },

    #[error("HTTP 415 Unsupported media type: {message}")]
    UnsupportedMediaType { message: String },

    #[error("HTTP {status} Request error: {message}")]
    Request { status: u16, message: String },

    #[error("HTTP 429 Rate limit exceeded ({limit_type}): {message}")]
    ServerRateLimitExceeded {
        message: String,
        limit_type: String,
        retry_after: Option<u64>,
    },

    #[error("HTTP 500 Internal server error: {message}")]
    InternalServerError { message: String },

    #[error("HTTP 503 Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("HTTP {status} Server error: {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No replay data found at {} and recording is disabled", path.display())]
    ReplayDataMissing { path: PathBuf },

    #[error("Replay data error: {0}")]
    Replay(#[from] std::io::Error),

    #[error("Decoding raw response error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl RiotApiError {
    /// HTTP status the error originates from, `None` when no response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::DataNotFound { .. } => Some(404),
            Self::UnsupportedMediaType { .. } => Some(415),
            Self::ServerRateLimitExceeded { .. } => Some(429),
            Self::InternalServerError { .. } => Some(500),
            Self::ServiceUnavailable { .. } => Some(503),
            Self::Request { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 4xx responses other than 429, and missing replay data.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. }
                | Self::Unauthorized { .. }
                | Self::Forbidden { .. }
                | Self::DataNotFound { .. }
                | Self::UnsupportedMediaType { .. }
                | Self::Request { .. }
                | Self::ReplayDataMissing { .. }
        )
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::InternalServerError { .. } | Self::ServiceUnavailable { .. } | Self::Server { .. }
        )
    }

    /// Either the local admission control or the server refused the call.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::ClientRateLimitExceeded { .. } | Self::ServerRateLimitExceeded { .. }
        )
    }
}

/// A call to Riot API can either result in a success with the success type or fail with a [`RiotApiError`].
pub type RiotApiResponse<T> = Result<T, RiotApiError>;
