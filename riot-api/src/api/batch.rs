//! Deferred calls grouped under named batches.
//!
//! Nothing is dispatched when a call is enqueued; committing a batch runs
//! every call of that batch concurrently and settles each one exactly once.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::pipeline::CallOutcome;
use super::request::PipelineRequest;
use crate::types::RiotApiResponse;

/// Consumes the result of a deferred call, returns whether it succeeded.
pub(crate) type Settle = Box<dyn FnOnce(RiotApiResponse<CallOutcome>) -> bool + Send>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchHandle {
    id: Uuid,
    batch: String,
}

impl BatchHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn batch(&self) -> &str {
        &self.batch
    }
}

pub(crate) struct PendingCall {
    pub(crate) handle: BatchHandle,
    pub(crate) request: PipelineRequest,
    pub(crate) settle: Settle,
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("handle", &self.handle)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

/// How the calls of a committed batch settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn settled(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Debug, Default)]
pub struct BatchQueue {
    pending: Mutex<HashMap<String, Vec<PendingCall>>>,
}

impl BatchQueue {
    fn pending_calls(&self) -> MutexGuard<'_, HashMap<String, Vec<PendingCall>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn push(&self, batch: &str, request: PipelineRequest, settle: Settle) -> BatchHandle {
        let handle = BatchHandle {
            id: Uuid::new_v4(),
            batch: batch.to_string(),
        };
        self.pending_calls()
            .entry(batch.to_string())
            .or_default()
            .push(PendingCall {
                handle: handle.clone(),
                request,
                settle,
            });
        handle
    }

    /// Remove and return every call of `batch`, leaving other batches untouched.
    pub(crate) fn take(&self, batch: &str) -> Vec<PendingCall> {
        self.pending_calls().remove(batch).unwrap_or_default()
    }

    pub fn pending(&self, batch: &str) -> usize {
        self.pending_calls().get(batch).map_or(0, Vec::len)
    }
}
