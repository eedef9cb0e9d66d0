use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

use crate::tx_type::TxType;

/// A single EIP-2930 access-list entry.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

/// ECDSA signature components, shared by the sender signature and (for
/// fee-delegated transactions) the fee-payer signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct Signature {
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

/// A persisted transaction (spec §3.1). All variants share this one
/// struct; `tx_type` plus the `Option` fields distinguish legacy,
/// access-list, dynamic-fee, and fee-delegated dynamic-fee envelopes
/// rather than fanning out into an enum, mirroring how the fee-payer
/// fields are simply absent outside type 22.
///
/// RLP encoding is implemented by hand in `rlp_codec`: the field layout
/// differs per `tx_type` and a derive macro can't express that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: B256,
    pub tx_type: TxType,
    pub nonce: u64,
    pub sender: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    /// Legacy/access-list gas price. `None` for dynamic-fee variants.
    pub gas_price: Option<U256>,
    /// EIP-1559 fee caps. `None` for legacy/access-list variants.
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub input: Bytes,
    pub access_list: Vec<AccessListItem>,
    pub signature: Signature,
    /// Present only for `TxType::FeeDelegatedDynamicFee`.
    pub fee_payer: Option<Address>,
    pub fee_payer_signature: Option<Signature>,
    /// Cached ECDSA-recovered sender, populated once by the fetcher
    /// (spec §9 "sender recovery"); avoids re-recovering on every read.
    /// `sender` above is the authoritative field once this cache is
    /// warm — the two are kept in sync by whoever populates this slot.
    pub recovered_sender: Option<Address>,
}

impl Transaction {
    /// True when this transaction was a contract-creation attempt
    /// (`to` absent), independent of whether it ultimately succeeded.
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

/// Where a transaction lives within the chain (spec §3.1). A hash maps
/// to exactly one location; deleting the owning block deletes this row
/// in the same batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct TxLocation {
    pub block_height: u64,
    pub block_hash: B256,
    pub index_in_block: u32,
}
