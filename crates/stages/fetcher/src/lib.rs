//! Concurrent, in-order block ingestion pipeline (spec §4.5,
//! component E) — "the central algorithm" tying components A–D
//! together with an upstream RPC client and the optimizer (component
//! F).

mod backoff;
mod commit;
mod concurrent;
mod config;
mod error;
mod events;
mod gap;
mod job;
mod loops;
mod metrics_hooks;
mod range;
mod state;

use std::sync::Arc;

use indexer_db::Database;
use indexer_index::IndexBuilder;
use indexer_metrics::{Optimizer, RpcMetrics};
use indexer_provider::Provider;
use indexer_rpc_client::RpcClient;
use indexer_wbft::WbftBuilder;

pub use config::FetcherConfig;
pub use error::{FetchError, FetchResult};
pub use events::{BlockEvent, EventBus, LogEvent, TransactionEvent};
pub use indexer_primitives::GapRange;
pub use job::FetchedBlock;
pub use state::BlockState;

use metrics_hooks::MetricsHooks;

/// Owns the ingestion lifecycle: single-block and range fetches, gap
/// recovery, and the two standalone run loops. Generic over the KV
/// [`Database`] and the upstream [`RpcClient`].
#[derive(Debug, Clone)]
pub struct Fetcher<DB, R> {
    provider: Provider<DB>,
    index_builder: IndexBuilder,
    wbft_builder: WbftBuilder<DB>,
    rpc: Arc<R>,
    config: FetcherConfig,
    metrics_hooks: MetricsHooks,
    optimizer: Option<Arc<Optimizer>>,
    events: Option<EventBus>,
}

impl<DB: Database, R: RpcClient> Fetcher<DB, R> {
    pub fn new(
        db: Arc<DB>,
        chain_params: indexer_primitives::ChainParams,
        rpc: Arc<R>,
        config: FetcherConfig,
        metrics: Arc<RpcMetrics>,
    ) -> Self {
        Self {
            provider: Provider::new(db.clone()),
            index_builder: IndexBuilder::new(),
            wbft_builder: WbftBuilder::new(db, chain_params),
            rpc,
            config,
            metrics_hooks: MetricsHooks::new(metrics),
            optimizer: None,
            events: None,
        }
    }

    pub fn with_optimizer(mut self, optimizer: Arc<Optimizer>) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn provider(&self) -> &Provider<DB> {
        &self.provider
    }

    pub fn metrics(&self) -> &Arc<RpcMetrics> {
        self.metrics_hooks.metrics()
    }
}
