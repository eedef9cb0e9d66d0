use alloy_primitives::{Address, Bloom, Bytes, B256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// A single emitted event (spec §3.1). Keyed in storage by the composite
/// (block number, tx index, log index).
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct Log {
    pub block_number: u64,
    pub tx_index: u32,
    pub log_index: u32,
    pub address: Address,
    /// Up to 4 topics; `topic[0]` is conventionally the event signature
    /// hash.
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl Log {
    pub fn topic(&self, i: usize) -> Option<B256> {
        self.topics.get(i).copied()
    }
}

/// Transaction execution outcome (spec §3.1).
///
/// `contract_address` is placed last so `#[rlp(trailing)]` can omit it
/// outright for the overwhelming majority of receipts that aren't
/// contract creations, rather than encoding a sentinel zero address.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
#[rlp(trailing)]
pub struct Receipt {
    pub tx_hash: B256,
    pub tx_index: u32,
    pub block_height: u64,
    /// `true` for status 1 (success), `false` for status 0.
    pub success: bool,
    pub cumulative_gas_used: u64,
    pub gas_used: u64,
    pub effective_gas_price: alloy_primitives::U256,
    pub logs: Vec<Log>,
    pub logs_bloom: Bloom,
    pub receipt_type: u8,
    /// Set only when the transaction was a successful contract creation.
    pub contract_address: Option<Address>,
}

impl Receipt {
    pub fn is_contract_creation(&self) -> bool {
        self.success && self.contract_address.is_some()
    }
}
