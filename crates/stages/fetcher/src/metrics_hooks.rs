//! Bridges the fetcher's retry loop to [`indexer_metrics::RpcMetrics`],
//! stamping wall-clock time at the call site so the metrics crate
//! itself never calls `Instant::now()`.

use std::sync::Arc;
use std::time::Duration;

use indexer_metrics::RpcMetrics;

#[derive(Debug, Clone)]
pub struct MetricsHooks {
    metrics: Arc<RpcMetrics>,
}

impl MetricsHooks {
    pub fn new(metrics: Arc<RpcMetrics>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &Arc<RpcMetrics> {
        &self.metrics
    }

    pub fn record_call(&self, elapsed: Duration, success: bool, rate_limited: bool) {
        self.metrics.record_call(elapsed, success, rate_limited, std::time::Instant::now());
    }

    pub fn record_blocks_committed(&self, count: u64) {
        self.metrics.record_blocks_committed(count, std::time::Instant::now());
    }
}
