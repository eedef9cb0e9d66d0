//! End-to-end ingestion scenarios against an in-memory `RpcClient` and
//! a `tempfile`-backed real MDBX store — no network, no live chain.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{Address, Bloom, Bytes, B256};
use indexer_db::MdbxDatabase;
use indexer_fetcher::{Fetcher, FetcherConfig, GapRange};
use indexer_metrics::{Optimizer, OptimizerConfig, RpcMetrics};
use indexer_primitives::block::Header;
use indexer_primitives::{Block, ChainParams, Receipt, Transaction};
use indexer_provider::BlockReader;
use indexer_rpc_client::{RpcClient, RpcError, RpcResult};
use tokio_util::sync::CancellationToken;

/// An in-memory [`RpcClient`] serving a fixed chain, with optional
/// per-call failure injection for exercising retry/rate-limit paths.
struct FakeRpc {
    tip: u64,
    blocks: HashMap<u64, (Block, Vec<Transaction>)>,
    receipts: HashMap<u64, Vec<Receipt>>,
    call_count: AtomicU64,
    /// Heights whose *first* receipts call should fail transiently.
    fail_receipts_once: Mutex<HashMap<u64, bool>>,
    /// Every Nth call (1-indexed) returns a rate-limit error instead of succeeding.
    rate_limit_every: Option<u64>,
}

fn header(height: u64, gas_used: u64) -> Header {
    Header {
        height,
        hash: B256::repeat_byte((height % 250) as u8 + 1),
        parent_hash: B256::ZERO,
        timestamp: 1_700_000_000 + height,
        miner: Address::ZERO,
        gas_limit: 30_000_000,
        gas_used,
        extra_data: Bytes::new(),
        logs_bloom: Bloom::default(),
        transactions_root: B256::ZERO,
        receipts_root: B256::ZERO,
        state_root: B256::ZERO,
        base_fee_per_gas: None,
        withdrawals_root: None,
        blob_gas_used: None,
        excess_blob_gas: None,
    }
}

fn chain(count: u64) -> FakeRpc {
    let mut blocks = HashMap::new();
    let mut receipts = HashMap::new();
    for height in 0..count {
        blocks.insert(height, (Block { header: header(height, 21_000 + height), transaction_hashes: vec![], uncle_hashes: vec![] }, vec![]));
        receipts.insert(height, vec![]);
    }
    FakeRpc {
        tip: count - 1,
        blocks,
        receipts,
        call_count: AtomicU64::new(0),
        fail_receipts_once: Mutex::new(HashMap::new()),
        rate_limit_every: None,
    }
}

#[async_trait::async_trait]
impl RpcClient for FakeRpc {
    async fn get_latest_block_number(&self) -> RpcResult<u64> {
        Ok(self.tip)
    }

    async fn get_block_by_number(&self, height: u64) -> RpcResult<(Block, Vec<Transaction>)> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(every) = self.rate_limit_every {
            if n % every == 0 {
                return Err(RpcError::RateLimited("synthetic".into()));
            }
        }
        self.blocks.get(&height).cloned().ok_or_else(|| RpcError::Transport("no such block".into()))
    }

    async fn get_block_receipts(&self, height: u64) -> RpcResult<Vec<Receipt>> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(every) = self.rate_limit_every {
            if n % every == 0 {
                return Err(RpcError::RateLimited("synthetic".into()));
            }
        }

        let mut guard = self.fail_receipts_once.lock().unwrap();
        if let Some(should_fail) = guard.get_mut(&height) {
            if *should_fail {
                *should_fail = false;
                return Err(RpcError::Transport("transient receipts failure".into()));
            }
        }
        drop(guard);

        self.receipts.get(&height).cloned().ok_or_else(|| RpcError::Transport("no such receipts".into()))
    }

    async fn close(&self) -> RpcResult<()> {
        Ok(())
    }
}

fn fetcher(rpc: FakeRpc, num_workers: usize) -> (tempfile::TempDir, Fetcher<MdbxDatabase, FakeRpc>) {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(MdbxDatabase::open(dir.path()).unwrap());
    let config = FetcherConfig {
        num_workers,
        max_retries: 3,
        base_delay: Duration::from_millis(10),
        retry_delay: Duration::from_millis(10),
        ..Default::default()
    };
    let metrics = Arc::new(RpcMetrics::new(100, Duration::from_secs(60)));
    let f = Fetcher::new(db, ChainParams::default(), Arc::new(rpc), config, metrics);
    (dir, f)
}

/// Scenario 1: happy path.
#[tokio::test]
async fn happy_path_ingests_the_whole_chain_with_no_gaps() {
    let (_dir, f) = fetcher(chain(10), 4);
    let cancel = CancellationToken::new();

    f.fetch_range_concurrent(0, 9, &cancel).await.unwrap();

    assert_eq!(f.provider().get_latest_height().unwrap(), 9);
    assert!(f.detect_gaps(0, 9).unwrap().is_empty());
    for h in 0..10 {
        assert!(f.provider().has_block(h).unwrap());
    }
}

/// Scenario 2: retry-then-success.
#[tokio::test]
async fn transient_receipts_failure_recovers_on_retry() {
    let mut rpc = chain(10);
    rpc.fail_receipts_once.lock().unwrap().insert(1, true);
    let (_dir, f) = fetcher(rpc, 1);
    let cancel = CancellationToken::new();

    let started = std::time::Instant::now();
    f.fetch_range(0, 9, &cancel).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(10));

    for h in 0..10 {
        assert!(f.provider().has_block(h).unwrap());
    }
}

/// Scenario 3: gap fill.
#[tokio::test]
async fn gap_recovery_fills_every_missing_height() {
    let (_dir, f) = fetcher(chain(11), 4);
    let cancel = CancellationToken::new();

    for h in [0u64, 1, 2, 5, 6, 7, 10] {
        f.fetch_block(h, &cancel).await.unwrap();
    }
    assert_eq!(f.provider().get_latest_height().unwrap(), 10);

    let gaps = f.detect_gaps(0, 10).unwrap();
    assert_eq!(gaps, vec![GapRange { start: 3, end: 4 }, GapRange { start: 8, end: 9 }]);

    f.fill_gaps(&gaps, &cancel).await.unwrap();

    assert!(f.detect_gaps(0, 10).unwrap().is_empty());
    assert_eq!(f.provider().get_latest_height().unwrap(), 10);
}

/// Scenario 4: concurrent ordering — every stored block carries its
/// own unique `gas_used`, proving no cross-contamination between
/// workers.
#[tokio::test]
async fn concurrent_fetch_preserves_per_height_data_with_no_cross_contamination() {
    let (_dir, f) = fetcher(chain(50), 20);
    let cancel = CancellationToken::new();

    f.fetch_range_concurrent(0, 49, &cancel).await.unwrap();

    for h in 0..50 {
        let block = f.provider().get_block(h).unwrap();
        assert_eq!(block.header.gas_used, 21_000 + h);
    }
}

/// Scenario 5: rate-limit adaptation — the optimizer's recommended
/// worker count strictly decreases after observing a rate-limit error.
#[tokio::test]
async fn optimizer_shrinks_worker_count_after_rate_limit_errors() {
    let mut rpc = chain(30);
    rpc.rate_limit_every = Some(10);
    let (_dir, f) = fetcher(rpc, 4);
    let cancel = CancellationToken::new();

    let optimizer = Arc::new(Optimizer::new(Default::default(), 200, 40));
    let before = optimizer.current().workers;

    // Ignore the outcome: a rate-limited call can legitimately abort
    // the range after exhausting retries. What's under test is that
    // the shared metrics object observed the rate-limit signal.
    let _ = f.fetch_range_concurrent(0, 29, &cancel).await;

    let after = optimizer.adjust(f.metrics().as_ref(), std::time::Instant::now());
    assert!(after.workers < before);
}

/// Scenario 6: the optimizer is not just unit-tested in isolation —
/// `Fetcher::run`'s own loop calls `maybe_adjust` between batches, so a
/// sustained run against a rate-limiting upstream drives the
/// recommended worker count down on its own.
#[tokio::test]
async fn run_loop_drives_the_attached_optimizers_recommendations() {
    let mut rpc = chain(200);
    rpc.rate_limit_every = Some(2);

    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(MdbxDatabase::open(dir.path()).unwrap());
    let config = FetcherConfig {
        start_height: 0,
        batch_size: 5,
        num_workers: 4,
        max_retries: 1,
        base_delay: Duration::from_millis(1),
        retry_delay: Duration::from_millis(1),
        ..Default::default()
    };
    let metrics = Arc::new(RpcMetrics::new(50, Duration::from_secs(60)));
    let optimizer_config = OptimizerConfig { adjustment_interval: Duration::from_millis(1), ..Default::default() };
    let optimizer = Arc::new(Optimizer::new(optimizer_config, 100, 20));
    let initial_workers = optimizer.current().workers;

    let f = Arc::new(
        Fetcher::new(db, ChainParams::default(), Arc::new(rpc), config, metrics).with_optimizer(optimizer.clone()),
    );
    let cancel = CancellationToken::new();

    let run_handle = {
        let f = f.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = f.run(&cancel).await;
        })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();
    run_handle.await.unwrap();

    assert!(optimizer.current().workers < initial_workers);
}
