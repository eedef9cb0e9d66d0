//! Record types persisted by the derived index builder (spec §3.1,
//! §4.3). These live alongside the canonical block/receipt/log rows
//! but are never consulted for the `decode(encode(x)) == x` invariant
//! that binds component B — they are derived, and can in principle be
//! rebuilt from scratch by re-scanning blocks.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// keccak256("Transfer(address,address,uint256)") — shared by the
/// ERC-20 and ERC-721 `Transfer` events; topic count is what tells them
/// apart (spec §4.3).
pub const TRANSFER_EVENT_SIGNATURE: B256 = B256::new([
    0xdd, 0xf2, 0x52, 0xad, 0x1b, 0xe2, 0xc8, 0x9b, 0x69, 0xc2, 0xb0, 0x68, 0xfc, 0x37, 0x8d, 0xaa,
    0x95, 0x2b, 0xa7, 0xf1, 0x63, 0xc4, 0xa1, 0x16, 0x28, 0xf5, 0x5a, 0x4d, 0xf5, 0x23, 0xb3, 0xef,
]);

/// Server-side cap on any caller-supplied `limit` (spec §4.3).
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Recorded once per successful contract creation (spec §3.1), keyed by
/// the new contract's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct ContractCreation {
    pub creator: Address,
    pub tx_hash: B256,
    pub block_height: u64,
    pub timestamp: u64,
    pub bytecode_size: u64,
}

/// An ERC-20 `Transfer` event, decoded from a log whose `topic[0]`
/// matches [`TRANSFER_EVENT_SIGNATURE`] and carries exactly 3 topics
/// (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct Erc20Transfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub block_height: u64,
    pub tx_index: u32,
    pub log_index: u32,
}

/// An ERC-721 `Transfer` event — same signature, 4 topics, `token_id`
/// carried in `topic[3]` instead of `data` (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct Erc721Transfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub token_id: U256,
    pub block_height: u64,
    pub tx_index: u32,
    pub log_index: u32,
}

/// An optional internal-transfer record (spec §4.3, written only when a
/// trace source is available upstream; this core never produces traces
/// itself, so nothing currently writes this type — kept for
/// `indexer-fetcher` implementations that plug a trace source in).
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct InternalTransfer {
    pub tx_hash: B256,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub call_type: Bytes,
}

/// `(limit, offset)` pagination request, enforcing the server-side cap
/// (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: u32,
    pub offset: u32,
}

impl PageParams {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit: limit.min(MAX_PAGE_LIMIT), offset }
    }

    pub fn capped_limit(self) -> u32 {
        self.limit.min(MAX_PAGE_LIMIT)
    }
}

/// A page of results. `total` is the size of *this* page, not the
/// global count (spec §4.3) — callers probe `has_next_page` by
/// requesting `limit + 1` or by checking `items.len() == limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn total(&self) -> usize {
        self.items.len()
    }
}

/// A composite identifying one log's storage position, stored by the
/// log filter index so readers can fetch the full `Log` via component
/// B afterward (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct LogPosition {
    pub block_height: u64,
    pub tx_index: u32,
    pub log_index: u32,
}
