pub mod batch;
pub mod call_cache;
pub mod client;
pub mod clock;
pub mod endpoints;
pub mod hooks;
pub mod metrics;
pub mod pipeline;
pub mod rate_limit;
pub mod replay;
pub mod request;
pub mod settings;
pub mod store;
pub mod transport;
