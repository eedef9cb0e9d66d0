use alloy_primitives::{Address, Bloom, Bytes, B256, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// Block header fields the indexer persists (spec §3.1). Optional
/// post-London/EIP-4844 fields are carried as `Option` and placed at
/// the end of the struct so `#[rlp(trailing)]` can omit them entirely
/// on pre-fork blocks rather than encoding a sentinel value.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
#[rlp(trailing)]
pub struct Header {
    /// Unique key; height ↔ hash is bijective for any persisted block.
    pub height: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub timestamp: u64,
    /// Block proposer / miner address.
    pub miner: Address,
    pub gas_limit: u64,
    pub gas_used: u64,
    /// Raw consensus Extra field; decoded separately by `indexer-wbft`
    /// so a malformed Extra never blocks header persistence (spec §4.4,
    /// §7).
    pub extra_data: Bytes,
    pub logs_bloom: Bloom,
    pub transactions_root: B256,
    pub receipts_root: B256,
    pub state_root: B256,
    /// Set for post-EIP-1559 blocks.
    pub base_fee_per_gas: Option<U256>,
    /// Set for post-withdrawals (Shanghai-equivalent) blocks.
    pub withdrawals_root: Option<B256>,
    /// Set for post-EIP-4844 blocks.
    pub blob_gas_used: Option<u64>,
    pub excess_blob_gas: Option<u64>,
}

/// A full block: header plus the ordered list of transaction and uncle
/// hashes it contains (spec §3.1). Transaction bodies live in their own
/// keyspace, looked up by hash.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub transaction_hashes: Vec<B256>,
    pub uncle_hashes: Vec<B256>,
}

impl Block {
    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn hash(&self) -> B256 {
        self.header.hash
    }

    pub fn parent_hash(&self) -> B256 {
        self.header.parent_hash
    }
}
