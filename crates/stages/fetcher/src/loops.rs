//! `run` and `run_with_gap_recovery` — the fetcher's standalone
//! ingestion loops (spec §4.5).

use indexer_db::Database;
use indexer_provider::{BlockReader, ProviderError};
use indexer_rpc_client::RpcClient;
use tokio_util::sync::CancellationToken;

use crate::error::{FetchError, FetchResult};
use crate::job::sleep_cancellable;
use crate::Fetcher;

impl<DB: Database, R: RpcClient + 'static> Fetcher<DB, R> {
    fn next_height(&self) -> FetchResult<u64> {
        match self.provider.get_latest_height() {
            Ok(latest) => Ok(self.config.start_height.max(latest + 1)),
            Err(ProviderError::NotFound) => Ok(self.config.start_height),
            Err(e) => Err(e.into()),
        }
    }

    /// Follows the chain tip indefinitely until `cancel` fires.
    pub async fn run(&self, cancel: &CancellationToken) -> FetchResult<()> {
        let mut next = self.next_height()?;

        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            let tip = match self.rpc.get_latest_block_number().await {
                Ok(tip) => tip,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to query chain tip, retrying");
                    sleep_cancellable(self.config.retry_delay, cancel).await?;
                    continue;
                }
            };

            if next > tip {
                sleep_cancellable(self.config.retry_delay, cancel).await?;
                continue;
            }

            self.maybe_adjust_optimizer();

            let batch_size = self.current_batch_size();
            let batch_end = (next + batch_size as u64 - 1).min(tip);

            match self.fetch_range(next, batch_end, cancel).await {
                Ok(()) => next = batch_end + 1,
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(err) => {
                    tracing::warn!(error = %err, from = next, to = batch_end, "range fetch failed, retrying");
                    sleep_cancellable(self.config.retry_delay, cancel).await?;
                }
            }
        }
    }

    /// Reconciles any pre-existing gaps below `META/latest_height`
    /// before entering [`Fetcher::run`].
    pub async fn run_with_gap_recovery(&self, cancel: &CancellationToken) -> FetchResult<()> {
        if let Ok(latest) = self.provider.get_latest_height() {
            if latest > self.config.start_height {
                let gaps = self.detect_gaps(self.config.start_height, latest)?;
                self.fill_gaps(&gaps, cancel).await?;
            }
        }
        self.run(cancel).await
    }

    pub(crate) fn current_batch_size(&self) -> usize {
        match &self.optimizer {
            Some(optimizer) => optimizer.batch_size(),
            None => self.config.batch_size,
        }
    }

    pub(crate) fn current_num_workers(&self) -> usize {
        match &self.optimizer {
            Some(optimizer) => optimizer.workers(),
            None => self.config.num_workers,
        }
    }

    /// Recomputes the optimizer's recommendation from observed RPC
    /// metrics, gated by its own `adjustment_interval` (spec §4.6). A
    /// no-op when no optimizer was attached via [`Fetcher::with_optimizer`].
    pub(crate) fn maybe_adjust_optimizer(&self) {
        if let Some(optimizer) = &self.optimizer {
            optimizer.maybe_adjust(self.metrics_hooks.metrics().as_ref(), std::time::Instant::now());
        }
    }
}
