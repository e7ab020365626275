use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
    #[error("Unknown region: {0}")]
    UnknownRegion(String),
}

/// Failure reported by a [`crate::traits::PersistentStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend is unavailable: {0}")]
    Unavailable(String),
    #[error("an error occured while encoding a store entry: {0}")]
    Encoding(String),
    #[error("an error occured while decoding store entry `{key}`: {reason}")]
    Decoding { key: String, reason: String },
}
