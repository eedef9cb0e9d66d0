//! `fetch_block_job`: a pure fetch-and-retry with no storage writes,
//! shared by both the sequential path (`fetch_block`) and each worker
//! in `fetch_range_concurrent` (spec §4.5).

use std::time::Duration;

use indexer_primitives::{Block, Receipt, Transaction};
use indexer_rpc_client::RpcClient;
use tokio_util::sync::CancellationToken;

use crate::backoff::backoff_delay;
use crate::config::FetcherConfig;
use crate::error::{FetchError, FetchResult};
use crate::metrics_hooks::MetricsHooks;

/// One successfully fetched block: body, its transaction bodies, and
/// its receipts — everything `Provider::block_batch` needs.
#[derive(Debug, Clone)]
pub struct FetchedBlock {
    pub height: u64,
    pub block: Block,
    pub transactions: Vec<Transaction>,
    pub receipts: Vec<Receipt>,
}

/// Retries `get_block_by_number` and `get_block_receipts` independently,
/// each up to `config.max_retries`, with exponential backoff between
/// attempts. Both must succeed before this returns `Ok`; neither call
/// writes anything.
pub async fn fetch_block_job<R: RpcClient>(
    rpc: &R,
    height: u64,
    config: &FetcherConfig,
    metrics: Option<&MetricsHooks>,
    cancel: &CancellationToken,
) -> FetchResult<FetchedBlock> {
    let (block, transactions) =
        retry_call(height, config, metrics, cancel, |attempt| {
            tracing::debug!(height, attempt, "fetching block");
            rpc.get_block_by_number(height)
        })
        .await?;

    let receipts = retry_call(height, config, metrics, cancel, |attempt| {
        tracing::debug!(height, attempt, "fetching receipts");
        rpc.get_block_receipts(height)
    })
    .await?;

    Ok(FetchedBlock { height, block, transactions, receipts })
}

async fn retry_call<T, F, Fut>(
    height: u64,
    config: &FetcherConfig,
    metrics: Option<&MetricsHooks>,
    cancel: &CancellationToken,
    mut call: F,
) -> FetchResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = indexer_rpc_client::RpcResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let started = std::time::Instant::now();
        let result = call(attempt).await;
        let elapsed = started.elapsed();

        match result {
            Ok(value) => {
                if let Some(hooks) = metrics {
                    hooks.record_call(elapsed, true, false);
                }
                return Ok(value);
            }
            Err(err) => {
                let rate_limited = err.is_rate_limited();
                if let Some(hooks) = metrics {
                    hooks.record_call(elapsed, false, rate_limited);
                }

                if attempt + 1 >= config.max_retries {
                    tracing::warn!(height, attempt, error = %err, "exhausted retries");
                    return Err(FetchError::RetriesExhausted(config.max_retries, height));
                }

                let delay = backoff_delay(attempt + 1, config.base_delay);
                tracing::debug!(height, attempt, ?delay, error = %err, "retrying after backoff");
                attempt += 1;
                sleep_cancellable(delay, cancel).await?;
            }
        }
    }
}

/// Sleeps `delay`, returning early with `FetchError::Cancelled` if the
/// token fires first (spec §4.5: "checked at ... retry backoff
/// interior").
pub(crate) async fn sleep_cancellable(delay: Duration, cancel: &CancellationToken) -> FetchResult<()> {
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = cancel.cancelled() => Err(FetchError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use alloy_primitives::{Address, Bloom, Bytes, B256};
    use indexer_primitives::block::Header;
    use indexer_rpc_client::RpcError;

    use super::*;

    struct FlakyClient {
        block_failures_remaining: AtomicU32,
    }

    fn sample_block(height: u64) -> Block {
        Block {
            header: Header {
                height,
                hash: B256::repeat_byte(height as u8 + 1),
                parent_hash: B256::ZERO,
                timestamp: height,
                miner: Address::ZERO,
                gas_limit: 30_000_000,
                gas_used: 21_000 + height,
                extra_data: Bytes::new(),
                logs_bloom: Bloom::default(),
                transactions_root: B256::ZERO,
                receipts_root: B256::ZERO,
                state_root: B256::ZERO,
                base_fee_per_gas: None,
                withdrawals_root: None,
                blob_gas_used: None,
                excess_blob_gas: None,
            },
            transaction_hashes: vec![],
            uncle_hashes: vec![],
        }
    }

    #[async_trait::async_trait]
    impl RpcClient for FlakyClient {
        async fn get_latest_block_number(&self) -> indexer_rpc_client::RpcResult<u64> {
            Ok(100)
        }

        async fn get_block_by_number(&self, height: u64) -> indexer_rpc_client::RpcResult<(Block, Vec<Transaction>)> {
            if self.block_failures_remaining.load(Ordering::SeqCst) > 0 {
                self.block_failures_remaining.fetch_sub(1, Ordering::SeqCst);
                return Err(RpcError::Transport("transient".into()));
            }
            Ok((sample_block(height), vec![]))
        }

        async fn get_block_receipts(&self, _height: u64) -> indexer_rpc_client::RpcResult<Vec<Receipt>> {
            Ok(vec![])
        }

        async fn close(&self) -> indexer_rpc_client::RpcResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures_within_retry_budget() {
        let client = FlakyClient { block_failures_remaining: AtomicU32::new(1) };
        let config = FetcherConfig { max_retries: 3, base_delay: Duration::from_millis(1), ..Default::default() };
        let cancel = CancellationToken::new();

        let fetched = fetch_block_job(&client, 5, &config, None, &cancel).await.unwrap();
        assert_eq!(fetched.block.header.gas_used, 21_005);
    }

    #[tokio::test]
    async fn exhausting_retries_surfaces_an_error() {
        let client = FlakyClient { block_failures_remaining: AtomicU32::new(10) };
        let config = FetcherConfig { max_retries: 2, base_delay: Duration::from_millis(1), ..Default::default() };
        let cancel = CancellationToken::new();

        let result = fetch_block_job(&client, 5, &config, None, &cancel).await;
        assert!(matches!(result, Err(FetchError::RetriesExhausted(2, 5))));
    }

    #[tokio::test]
    async fn cancellation_is_observed_before_the_first_call() {
        let client = FlakyClient { block_failures_remaining: AtomicU32::new(0) };
        let config = FetcherConfig::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = fetch_block_job(&client, 1, &config, None, &cancel).await;
        assert!(matches!(result, Err(FetchError::Cancelled)));
    }

    #[tokio::test]
    async fn backoff_elapses_at_least_base_delay_before_second_attempt() {
        let client = Arc::new(FlakyClient { block_failures_remaining: AtomicU32::new(1) });
        let config = FetcherConfig { max_retries: 3, base_delay: Duration::from_millis(100), ..Default::default() };
        let cancel = CancellationToken::new();

        let started = std::time::Instant::now();
        fetch_block_job(client.as_ref(), 1, &config, None, &cancel).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
