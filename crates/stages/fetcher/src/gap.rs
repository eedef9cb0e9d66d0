//! Gap detection and backfill (spec §4.5).

use indexer_db::Database;
use indexer_primitives::GapRange;
use indexer_provider::BlockReader;
use indexer_rpc_client::RpcClient;
use tokio_util::sync::CancellationToken;

use crate::error::FetchResult;
use crate::Fetcher;

impl<DB: Database, R: RpcClient + 'static> Fetcher<DB, R> {
    /// Scans `has_block(h)` for `h in [start, end]`, returning one
    /// `GapRange` per maximal contiguous run of missing heights.
    pub fn detect_gaps(&self, start: u64, end: u64) -> FetchResult<Vec<GapRange>> {
        let mut gaps = Vec::new();
        let mut run_start: Option<u64> = None;

        for height in start..=end {
            let present = self.provider.has_block(height)?;
            match (present, run_start) {
                (false, None) => run_start = Some(height),
                (true, Some(s)) => {
                    gaps.push(GapRange { start: s, end: height - 1 });
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = run_start {
            gaps.push(GapRange { start: s, end });
        }

        Ok(gaps)
    }

    /// Delegates to the sequential fetch for small gaps, else the
    /// concurrent pipeline (spec §4.5 threshold, default 10).
    pub async fn fill_gap(&self, range: GapRange, cancel: &CancellationToken) -> FetchResult<()> {
        if range.size() <= self.config.gap_sequential_threshold {
            self.fetch_range(range.start, range.end, cancel).await
        } else {
            self.fetch_range_concurrent(range.start, range.end, cancel).await
        }
    }

    pub async fn fill_gaps(&self, ranges: &[GapRange], cancel: &CancellationToken) -> FetchResult<()> {
        for range in ranges {
            if cancel.is_cancelled() {
                return Err(crate::error::FetchError::Cancelled);
            }
            self.fill_gap(*range, cancel).await?;
        }
        Ok(())
    }
}
