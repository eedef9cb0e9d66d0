use std::time::Duration;

/// Tunables for the fetcher pipeline (spec §4.5).
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// First height to fetch if the store is empty.
    pub start_height: u64,
    /// Blocks per `fetch_range` call in the main loop; adjusted at
    /// runtime by the optimizer, bounded `[5, 50]`.
    pub batch_size: usize,
    /// Worker count for `fetch_range_concurrent`; adjusted at runtime
    /// by the optimizer, bounded `[MIN_WORKERS, MAX_WORKERS]`.
    pub num_workers: usize,
    /// Per-call retry ceiling for `fetch_block_job`'s two RPC calls.
    pub max_retries: u32,
    /// Base for the exponential backoff between retries.
    pub base_delay: Duration,
    /// Sleep applied when the RPC tip query fails or the fetcher has
    /// caught up to the tip.
    pub retry_delay: Duration,
    /// Sequential-vs-concurrent threshold for `fill_gap`.
    pub gap_sequential_threshold: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            start_height: 0,
            batch_size: 20,
            num_workers: 100,
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            retry_delay: Duration::from_millis(500),
            gap_sequential_threshold: 10,
        }
    }
}
