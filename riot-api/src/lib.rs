//! Riot API client built around a single request pipeline.
//!
//! Every endpoint wrapper goes through the same path: admission control
//! against the locally tracked rate limits, replay fixtures, the call cache
//! and finally the network. Server reported limits are reconciled after each
//! call and the client state can be persisted into any
//! [`riftcall_shared::traits::PersistentStore`].

pub mod api;
pub mod types;

pub use api::client::{RiotClient, RiotClientBuilder};
pub use types::{RiotApiError, RiotApiResponse};
pub use api::batch::{BatchHandle, BatchSummary};
pub use api::clock::{Clock, ManualClock, SystemClock};
pub use api::pipeline::{CallOutcome, ResponseSource};
pub use api::request::{ApiKeyKind, Method, PipelineRequest, Routing, resources};
pub use api::settings::KeyIncludeMode;
pub use api::store::MemoryStore;
