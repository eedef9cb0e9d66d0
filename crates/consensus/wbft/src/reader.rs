//! Read side of the consensus store (spec §4.4).

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy_primitives::Address;
use indexer_db::{keys, Database};

use crate::codec::decode;
use crate::error::WbftResult;
use crate::types::{ConsensusData, EpochInfo, RoundChangeAnalysis, ValidatorSigningActivity, ValidatorStats, WbftExtra};

#[derive(Debug, Clone)]
pub struct WbftReader<DB> {
    db: Arc<DB>,
}

impl<DB: Database> WbftReader<DB> {
    pub fn new(db: Arc<DB>) -> Self {
        Self { db }
    }

    pub fn block_extra(&self, height: u64) -> WbftResult<WbftExtra> {
        let bytes = self.db.get(&keys::wbft_block_extra_key(height))?;
        decode(&bytes)
    }

    pub fn consensus_data(&self, height: u64) -> WbftResult<ConsensusData> {
        let bytes = self.db.get(&keys::wbft_consensus_data_key(height))?;
        decode(&bytes)
    }

    pub fn epoch_info(&self, epoch_number: u64) -> WbftResult<EpochInfo> {
        let bytes = self.db.get(&keys::wbft_epoch_key(epoch_number))?;
        decode(&bytes)
    }

    /// Aggregates one validator's signing record over `[from_height,
    /// to_height]` via a single sequential cursor walk over the
    /// `(block, validator)`-ordered activity rows (spec §4.4).
    pub fn validator_stats(
        &self,
        address: Address,
        from_height: u64,
        to_height: u64,
    ) -> WbftResult<ValidatorStats> {
        let (start, end) = keys::wbft_activity_range(from_height, to_height);
        let mut signed = 0u64;
        let mut missed = 0u64;

        for (_key, value) in self.db.scan(&start, &end)? {
            let activity: ValidatorSigningActivity = decode(&value)?;
            if activity.validator != address {
                continue;
            }
            if activity.signed_commit {
                signed += 1;
            } else {
                missed += 1;
            }
        }

        Ok(ValidatorStats { total_blocks: signed + missed, commits_signed: signed, commits_missed: missed })
    }

    /// Scans `[from_height, to_height]`'s `ConsensusData` rows and
    /// tallies how many blocks reached a round beyond 0, plus a
    /// round -> count histogram (spec §4.4).
    pub fn round_change_analysis(&self, from_height: u64, to_height: u64) -> WbftResult<RoundChangeAnalysis> {
        let (start, end) = keys::wbft_block_extra_range(from_height, to_height);
        let mut analysis = RoundChangeAnalysis::default();
        let mut histogram: BTreeMap<u64, u64> = BTreeMap::new();

        for (_key, value) in self.db.scan(&start, &end)? {
            let extra: WbftExtra = decode(&value)?;
            analysis.total_blocks += 1;
            if extra.current_round > 0 {
                analysis.blocks_with_round_change += 1;
            }
            *histogram.entry(extra.current_round).or_insert(0) += 1;
        }

        analysis.histogram = histogram;
        Ok(analysis)
    }
}
