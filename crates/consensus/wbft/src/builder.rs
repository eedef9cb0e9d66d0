//! Per-block consensus-fact derivation (spec §4.4, component D). Runs
//! for each block before `META/latest_height` is advanced, writing into
//! the same atomic batch as components B and C. A malformed Extra is
//! logged and skipped — the block itself is still persisted by B.

use std::sync::Arc;

use indexer_db::{keys, Batch, Database};
use indexer_primitives::{ChainParams, Header};

use crate::codec::{decode, encode};
use crate::error::WbftResult;
use crate::parse::parse_wbft_extra;
use crate::types::{ConsensusData, EpochInfo, ValidatorSigningActivity, WbftExtra};

#[derive(Debug, Clone)]
pub struct WbftBuilder<DB> {
    db: Arc<DB>,
    chain_params: ChainParams,
}

impl<DB: Database> WbftBuilder<DB> {
    pub fn new(db: Arc<DB>, chain_params: ChainParams) -> Self {
        Self { db, chain_params }
    }

    /// Indexes one block's consensus facts into `batch`. Returns `Ok(())`
    /// both when indexing succeeds and when the Extra field is
    /// malformed (the latter only after logging a warning) — this
    /// method's `Err` is reserved for failures unrelated to the Extra
    /// field's own well-formedness (a genuine storage read error while
    /// looking up the active roster, for instance).
    pub fn index_block(&self, batch: &mut Batch, header: &Header) -> WbftResult<()> {
        let extra = match parse_wbft_extra(&header.extra_data) {
            Ok(extra) => extra,
            Err(err) => {
                tracing::warn!(
                    height = header.height,
                    error = %err,
                    "malformed wbft extra, skipping consensus indexing for this block"
                );
                return Ok(());
            }
        };

        let epoch_number = header.height / self.chain_params.epoch_length;

        if let Some(epoch_info) = &extra.epoch_info {
            if !epoch_info.is_well_formed() {
                tracing::warn!(
                    height = header.height,
                    epoch = epoch_info.epoch_number,
                    "epoch info fails validator/candidate invariants, skipping consensus indexing"
                );
                return Ok(());
            }
            batch.put(keys::wbft_epoch_key(epoch_info.epoch_number), encode(epoch_info));
        }

        let roster = match self.resolve_roster(epoch_number, extra.epoch_info.as_ref())? {
            Some(roster) => roster,
            None => {
                tracing::warn!(
                    height = header.height,
                    epoch = epoch_number,
                    "no epoch info available yet, skipping consensus indexing"
                );
                batch.put(keys::wbft_block_extra_key(header.height), encode(&extra));
                return Ok(());
            }
        };

        let roster_size = roster.validators.len();
        let prepare_signers = extra.current_prepared_seal.signer_indices(roster_size);
        let commit_signers = extra.current_committed_seal.signer_indices(roster_size);

        let mut commit_count = 0u32;
        let mut missed_prepare = Vec::new();
        let mut missed_commit = Vec::new();

        for (validator_index, candidate) in roster.validators.iter().enumerate() {
            let address = roster.candidates[*candidate as usize].address;
            let signed_prepare = prepare_signers.contains(&(validator_index as u32));
            let signed_commit = commit_signers.contains(&(validator_index as u32));

            if signed_commit {
                commit_count += 1;
            } else {
                missed_commit.push(address);
            }
            if !signed_prepare {
                missed_prepare.push(address);
            }

            let activity = ValidatorSigningActivity {
                block_height: header.height,
                validator: address,
                validator_index: validator_index as u32,
                signed_prepare,
                signed_commit,
                round: extra.current_round,
                timestamp: header.timestamp,
            };
            batch.put(keys::wbft_activity_key(header.height, address), encode(&activity));
        }

        // Exact 2/3 comparison via integer arithmetic; avoids floating
        // rounding at the 66.666...% boundary (spec §4.4).
        let is_healthy = roster_size > 0 && commit_count as usize * 3 >= roster_size * 2;
        let participation_rate_bps = if roster_size == 0 {
            0
        } else {
            (commit_count as u64 * 10_000 / roster_size as u64) as u32
        };

        let consensus_data = ConsensusData {
            block_height: header.height,
            round: extra.current_round,
            missed_prepare,
            missed_commit,
            commit_count,
            roster_size: roster_size as u32,
            participation_rate_bps,
            is_healthy,
        };

        batch.put(keys::wbft_block_extra_key(header.height), encode(&extra));
        batch.put(keys::wbft_consensus_data_key(header.height), encode(&consensus_data));

        Ok(())
    }

    /// Resolves the active roster for `epoch_number`: the epoch info
    /// embedded in this block if it is a boundary block, otherwise the
    /// most recently persisted `EpochInfo` with `epoch_number' <=
    /// epoch_number` (spec §4.4). Returns `None` if no epoch info is
    /// available yet (e.g. ingesting from genesis before the first
    /// boundary block).
    fn resolve_roster(
        &self,
        epoch_number: u64,
        this_block_epoch_info: Option<&EpochInfo>,
    ) -> WbftResult<Option<EpochInfo>> {
        if let Some(info) = this_block_epoch_info {
            return Ok(Some(info.clone()));
        }

        let mut candidate = epoch_number;
        loop {
            match self.db.get(&keys::wbft_epoch_key(candidate)) {
                Ok(bytes) => return Ok(Some(decode(&bytes)?)),
                Err(indexer_db::DbError::NotFound) => {
                    if candidate == 0 {
                        return Ok(None);
                    }
                    candidate -= 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
