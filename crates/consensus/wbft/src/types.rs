//! WBFT consensus data model (spec §3.1).

use alloy_primitives::{Address, FixedBytes, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// A BLS12-381 G1 public key, 48 bytes compressed.
pub type BlsPublicKey = FixedBytes<48>;
/// A BLS aggregate signature, 96 bytes compressed (G2).
pub type BlsSignature = FixedBytes<96>;

/// One aggregated seal: a bitmap of signing validator-roster indices
/// plus the BLS signature over the sealed message (spec §3.1, §4.4).
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct AggregatedSeal {
    pub sealers: alloy_primitives::Bytes,
    pub signature: BlsSignature,
}

impl AggregatedSeal {
    /// Resolves this seal's bitmap against a validator roster of `n`
    /// entries into the set of signing validator-roster indices (spec
    /// §4.4 "signer-bitmap resolution").
    pub fn signer_indices(&self, n: usize) -> Vec<u32> {
        crate::bitmap::decode_sealers_bitmap(&self.sealers, n)
    }
}

/// A candidate validator entry in an epoch's ordered roster source
/// list (spec §3.1). `diligence` is WBFT's weighting score for
/// validator selection (spec GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct Candidate {
    pub address: Address,
    pub diligence: U256,
}

/// The validator roster active for one epoch (spec §3.1). Embedded only
/// in epoch-boundary blocks' `WBFTExtra`; intra-epoch blocks reference
/// the most recently persisted one.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct EpochInfo {
    pub epoch_number: u64,
    pub candidates: Vec<Candidate>,
    /// Indices into `candidates`, parallel to `bls_public_keys`.
    pub validators: Vec<u32>,
    pub bls_public_keys: Vec<BlsPublicKey>,
}

impl EpochInfo {
    /// `true` iff every invariant in spec §3.1 holds: validators and
    /// BLS keys are the same length, and every validator index is a
    /// valid candidate index.
    pub fn is_well_formed(&self) -> bool {
        self.validators.len() == self.bls_public_keys.len()
            && self
                .validators
                .iter()
                .all(|&idx| (idx as usize) < self.candidates.len())
    }

    pub fn roster_addresses(&self) -> Vec<Address> {
        self.validators
            .iter()
            .map(|&idx| self.candidates[idx as usize].address)
            .collect()
    }
}

/// Parsed consensus Extra for one block (spec §3.1). `vanity` is not
/// RLP-encoded — it is the fixed 32-byte prefix ahead of the encoded
/// remainder (spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbftExtra {
    pub vanity: FixedBytes<32>,
    pub randao_reveal: FixedBytes<96>,
    pub previous_round: u64,
    pub current_round: u64,
    pub previous_prepared_seal: AggregatedSeal,
    pub previous_committed_seal: AggregatedSeal,
    pub current_prepared_seal: AggregatedSeal,
    pub current_committed_seal: AggregatedSeal,
    pub gas_tip: U256,
    /// Present only on epoch-boundary blocks (spec §3.1).
    pub epoch_info: Option<EpochInfo>,
}

/// The RLP-encoded remainder of a header's Extra field, i.e. everything
/// in [`WbftExtra`] except `vanity`. Kept as a distinct type since
/// `vanity` lives outside the RLP envelope.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
#[rlp(trailing)]
pub(crate) struct WbftExtraRlp {
    pub randao_reveal: FixedBytes<96>,
    pub previous_round: u64,
    pub current_round: u64,
    pub previous_prepared_seal: AggregatedSeal,
    pub previous_committed_seal: AggregatedSeal,
    pub current_prepared_seal: AggregatedSeal,
    pub current_committed_seal: AggregatedSeal,
    pub gas_tip: U256,
    pub epoch_info: Option<EpochInfo>,
}

/// Per-(block, validator) signing outcome (spec §3.1). Commit-signers
/// are the authoritative participation set; prepare is recorded too but
/// never gates anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct ValidatorSigningActivity {
    pub block_height: u64,
    pub validator: Address,
    pub validator_index: u32,
    pub signed_prepare: bool,
    pub signed_commit: bool,
    pub round: u64,
    pub timestamp: u64,
}

/// Per-block consensus summary, derived from the resolved bitmaps
/// against the active roster (spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct ConsensusData {
    pub block_height: u64,
    pub round: u64,
    pub missed_prepare: Vec<Address>,
    pub missed_commit: Vec<Address>,
    pub commit_count: u32,
    pub roster_size: u32,
    /// `commit_count / roster_size * 100`, as integer-scaled basis
    /// points (`1.0%` == `100`) so the type stays RLP-encodable without
    /// a floating-point codec; API callers divide by 100 for a percent.
    pub participation_rate_bps: u32,
    pub is_healthy: bool,
}

impl ConsensusData {
    pub fn participation_rate_percent(&self) -> f64 {
        self.participation_rate_bps as f64 / 100.0
    }
}

/// Aggregate result of [`crate::reader::WbftReader::validator_stats`]
/// (spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorStats {
    pub total_blocks: u64,
    pub commits_signed: u64,
    pub commits_missed: u64,
}

impl ValidatorStats {
    pub fn participation_rate_percent(&self) -> f64 {
        if self.total_blocks == 0 {
            return 0.0;
        }
        self.commits_signed as f64 / self.total_blocks as f64 * 100.0
    }
}

/// Result of [`crate::reader::WbftReader::round_change_analysis`]
/// (spec §4.4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundChangeAnalysis {
    pub total_blocks: u64,
    pub blocks_with_round_change: u64,
    /// round number -> count of blocks that reached that round.
    pub histogram: std::collections::BTreeMap<u64, u64>,
}

impl RoundChangeAnalysis {
    pub fn rate_percent(&self) -> f64 {
        if self.total_blocks == 0 {
            return 0.0;
        }
        self.blocks_with_round_change as f64 / self.total_blocks as f64 * 100.0
    }
}
