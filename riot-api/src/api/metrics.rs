use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::{Instrument, info_span};

use super::pipeline::ResponseSource;

/// Counters about how calls of a client were resolved.
#[derive(Debug)]
pub struct RequestMetrics {
    start: Instant,
    network: AtomicU64,
    cache_hits: AtomicU64,
    replay_hits: AtomicU64,
    rejected: AtomicU64,
    name: &'static str,
}

/// Point-in-time copy of [`RequestMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub network: u64,
    pub cache_hits: u64,
    pub replay_hits: u64,
    pub rejected: u64,
}

impl RequestMetrics {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            start: Instant::now(),
            network: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            replay_hits: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            name,
        })
    }

    pub fn record(&self, source: ResponseSource) {
        let counter = match source {
            ResponseSource::Network => &self.network,
            ResponseSource::Cache => &self.cache_hits,
            ResponseSource::Replay => &self.replay_hits,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// A call refused by the local admission control.
    pub fn reject(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            network: self.network.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            replay_hits: self.replay_hits.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    pub async fn log_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            let span = info_span!("📊 ", client = self.name);
            async {
                interval.tick().await;
                let snapshot = self.snapshot();
                let elapsed_min = self.start.elapsed().as_secs_f64() / 60.0;
                let avg = if elapsed_min > 0.0 {
                    snapshot.network as f64 / elapsed_min
                } else {
                    0.0
                };
                tracing::info!(
                    "{} requests executed (avg {:.2} req/min), {} served from cache, {} replayed, {} rejected locally",
                    snapshot.network,
                    avg,
                    snapshot.cache_hits,
                    snapshot.replay_hits,
                    snapshot.rejected
                );
            }
            .instrument(span)
            .await
        }
    }
}
