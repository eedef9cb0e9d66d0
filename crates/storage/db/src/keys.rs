//! Key-space conventions (spec §3.2): every key is a one-byte namespace
//! prefix followed by a canonical, sort-preserving binary encoding of
//! the secondary key. Numeric components used for range scans are
//! big-endian fixed-width so lexical order equals numeric order.
//!
//! Prefix assignments are part of the persisted format (spec §6) — a
//! migration-incompatible reassignment requires a `META/schema_version`
//! bump, tracked in `Namespace::SCHEMA_VERSION`.

use alloy_primitives::{Address, B256};

/// One-byte key-space namespace prefixes. Stable across releases; see
/// module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Namespace {
    /// `height -> Block` (RLP).
    BlockByHeight = 0x01,
    /// `hash -> height`, a reverse index onto `BlockByHeight`.
    BlockHashIndex = 0x02,
    /// `tx_hash -> Transaction` (RLP).
    TxByHash = 0x03,
    /// `tx_hash -> TxLocation` (RLP).
    TxLocation = 0x04,
    /// `tx_hash -> Receipt` (RLP).
    Receipt = 0x05,
    /// `(block_height, tx_index, log_index) -> Log` (RLP).
    Log = 0x06,
    /// `(address, block_height desc, tx_index asc) -> tx_hash`.
    AddressTxIndex = 0x07,
    /// `(token, from_or_to, address, block_height desc, tx_index asc,
    /// log_index asc) -> Erc20Transfer`.
    Erc20Transfer = 0x08,
    /// `token -> Erc20Transfer`, mirror of [`Self::Erc20Transfer`]
    /// keyed by token alone.
    Erc20TransferByToken = 0x09,
    /// `(token, from_or_to, address, block_height desc, tx_index asc,
    /// log_index asc) -> Erc721Transfer`.
    Erc721Transfer = 0x0a,
    /// `token -> Erc721Transfer`, mirror keyed by token alone.
    Erc721TransferByToken = 0x0b,
    /// `(token, token_id) -> current owner address`.
    Erc721Owner = 0x0c,
    /// `contract_address -> ContractCreation` (RLP).
    ContractCreation = 0x0d,
    /// `creator_address, deployment_order -> contract_address`.
    CreatorIndex = 0x0e,
    /// `block_height -> log positions`, part of the log filter index.
    LogByBlock = 0x0f,
    /// `(address, block_height) -> log positions`, part of the log
    /// filter index.
    LogByAddress = 0x10,
    /// `(topic_position, topic, block_height) -> log positions`, part
    /// of the log filter index.
    LogByTopic = 0x11,
    /// `(tx_hash, from, to) -> internal tx record`, optional.
    InternalTx = 0x12,
    /// `height -> WBFTBlockExtra` (RLP).
    WbftBlockExtra = 0x13,
    /// `epoch_number -> EpochInfo` (RLP).
    WbftEpoch = 0x14,
    /// `(block_height, validator_address) -> ValidatorSigningActivity`.
    WbftActivity = 0x15,
    /// `height -> ConsensusData` (RLP).
    WbftConsensusData = 0x16,
    /// Singleton metadata keys (`latest_height`, `schema_version`).
    Meta = 0xff,
}

impl Namespace {
    pub const fn prefix(self) -> u8 {
        self as u8
    }
}

/// Current on-disk schema version. Bump alongside any migration-
/// incompatible change to a [`Namespace`] assignment or key encoding.
pub const SCHEMA_VERSION: u32 = 1;

/// The singleton key holding the highest contiguously-indexed height
/// (spec §3.2). Its update is the commit point of a block.
pub fn latest_height_key() -> Vec<u8> {
    meta_key(b"latest_height")
}

pub fn schema_version_key() -> Vec<u8> {
    meta_key(b"schema_version")
}

fn meta_key(name: &[u8]) -> Vec<u8> {
    let mut key = vec![Namespace::Meta.prefix()];
    key.extend_from_slice(name);
    key
}

/// Encodes a `u64` height big-endian so lexical order equals numeric
/// order for range scans.
pub fn be_u64(v: u64) -> [u8; 8] {
    v.to_be_bytes()
}

pub fn be_u32(v: u32) -> [u8; 4] {
    v.to_be_bytes()
}

/// `namespace || height` — the canonical block-by-height key.
pub fn block_height_key(height: u64) -> Vec<u8> {
    prefixed(Namespace::BlockByHeight, &be_u64(height))
}

/// `namespace || hash` — reverse index onto the block-by-height key.
pub fn block_hash_key(hash: B256) -> Vec<u8> {
    prefixed(Namespace::BlockHashIndex, hash.as_slice())
}

pub fn tx_hash_key(hash: B256) -> Vec<u8> {
    prefixed(Namespace::TxByHash, hash.as_slice())
}

pub fn tx_location_key(hash: B256) -> Vec<u8> {
    prefixed(Namespace::TxLocation, hash.as_slice())
}

pub fn receipt_key(tx_hash: B256) -> Vec<u8> {
    prefixed(Namespace::Receipt, tx_hash.as_slice())
}

/// `namespace || block_height || tx_index || log_index` — composite
/// log key (spec §3.1).
pub fn log_key(block_height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    let mut buf = vec![Namespace::Log.prefix()];
    buf.extend_from_slice(&be_u64(block_height));
    buf.extend_from_slice(&be_u32(tx_index));
    buf.extend_from_slice(&be_u32(log_index));
    buf
}

pub fn log_key_range(block_height: u64) -> (Vec<u8>, Vec<u8>) {
    let start = log_key(block_height, 0, 0);
    let end = log_key(block_height, u32::MAX, u32::MAX);
    (start, end)
}

/// `namespace || address || (u64::MAX - height) || tx_index` — the
/// address-of-transaction index key. Subtracting the height from
/// `u64::MAX` makes ascending-key order equal descending-height order,
/// matching the pagination contract's default sort (spec §4.3).
pub fn address_tx_key(address: Address, height: u64, tx_index: u32) -> Vec<u8> {
    let mut buf = vec![Namespace::AddressTxIndex.prefix()];
    buf.extend_from_slice(address.as_slice());
    buf.extend_from_slice(&be_u64(u64::MAX - height));
    buf.extend_from_slice(&be_u32(tx_index));
    buf
}

pub fn address_tx_prefix(address: Address) -> Vec<u8> {
    let mut buf = vec![Namespace::AddressTxIndex.prefix()];
    buf.extend_from_slice(address.as_slice());
    buf
}

pub fn contract_creation_key(contract_address: Address) -> Vec<u8> {
    prefixed(Namespace::ContractCreation, contract_address.as_slice())
}

pub fn creator_index_key(creator: Address, deployment_order: u64) -> Vec<u8> {
    let mut buf = vec![Namespace::CreatorIndex.prefix()];
    buf.extend_from_slice(creator.as_slice());
    buf.extend_from_slice(&be_u64(deployment_order));
    buf
}

pub fn creator_index_prefix(creator: Address) -> Vec<u8> {
    prefixed(Namespace::CreatorIndex, creator.as_slice())
}

/// `namespace || token || from_or_to || holder || (MAX-height) ||
/// tx_index || log_index` — ERC-20/721 transfer index key, shared
/// shape for both namespaces (spec §3.1, §4.3).
pub fn transfer_key(
    namespace: Namespace,
    token: Address,
    holder: Address,
    height: u64,
    tx_index: u32,
    log_index: u32,
) -> Vec<u8> {
    let mut buf = vec![namespace.prefix()];
    buf.extend_from_slice(token.as_slice());
    buf.extend_from_slice(holder.as_slice());
    buf.extend_from_slice(&be_u64(u64::MAX - height));
    buf.extend_from_slice(&be_u32(tx_index));
    buf.extend_from_slice(&be_u32(log_index));
    buf
}

pub fn transfer_by_token_key(
    namespace: Namespace,
    token: Address,
    height: u64,
    tx_index: u32,
    log_index: u32,
) -> Vec<u8> {
    let mut buf = vec![namespace.prefix()];
    buf.extend_from_slice(token.as_slice());
    buf.extend_from_slice(&be_u64(u64::MAX - height));
    buf.extend_from_slice(&be_u32(tx_index));
    buf.extend_from_slice(&be_u32(log_index));
    buf
}

pub fn transfer_prefix(namespace: Namespace, token: Address, holder: Option<Address>) -> Vec<u8> {
    let mut buf = vec![namespace.prefix()];
    buf.extend_from_slice(token.as_slice());
    if let Some(h) = holder {
        buf.extend_from_slice(h.as_slice());
    }
    buf
}

/// `namespace || token || token_id` — current-owner row, overwritten
/// on every ERC-721 Transfer (spec §3.1).
pub fn erc721_owner_key(token: Address, token_id: alloy_primitives::U256) -> Vec<u8> {
    let mut buf = vec![Namespace::Erc721Owner.prefix()];
    buf.extend_from_slice(token.as_slice());
    buf.extend_from_slice(&token_id.to_be_bytes::<32>());
    buf
}

/// `namespace || block_height || tx_index || log_index` — log filter
/// index row keyed by block alone (spec §4.3).
pub fn log_by_block_key(block_height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    let mut buf = vec![Namespace::LogByBlock.prefix()];
    buf.extend_from_slice(&be_u64(block_height));
    buf.extend_from_slice(&be_u32(tx_index));
    buf.extend_from_slice(&be_u32(log_index));
    buf
}

pub fn log_by_block_range(from_height: u64, to_height: u64) -> (Vec<u8>, Vec<u8>) {
    let start = log_by_block_key(from_height, 0, 0);
    let end = log_by_block_key(to_height, u32::MAX, u32::MAX);
    (start, end)
}

/// `namespace || address || block_height || tx_index || log_index` —
/// log filter index row keyed by emitting address, so a query bounded
/// by `(fromBlock, toBlock)` is one sequential cursor walk (spec §4.3).
pub fn log_by_address_key(
    address: Address,
    block_height: u64,
    tx_index: u32,
    log_index: u32,
) -> Vec<u8> {
    let mut buf = vec![Namespace::LogByAddress.prefix()];
    buf.extend_from_slice(address.as_slice());
    buf.extend_from_slice(&be_u64(block_height));
    buf.extend_from_slice(&be_u32(tx_index));
    buf.extend_from_slice(&be_u32(log_index));
    buf
}

pub fn log_by_address_range(address: Address, from_height: u64, to_height: u64) -> (Vec<u8>, Vec<u8>) {
    let start = log_by_address_key(address, from_height, 0, 0);
    let end = log_by_address_key(address, to_height, u32::MAX, u32::MAX);
    (start, end)
}

/// `namespace || topic_position || topic || block_height || tx_index ||
/// log_index` — log filter index row keyed by a topic at a fixed
/// position (spec §4.3).
pub fn log_by_topic_key(
    topic_position: u8,
    topic: B256,
    block_height: u64,
    tx_index: u32,
    log_index: u32,
) -> Vec<u8> {
    let mut buf = vec![Namespace::LogByTopic.prefix(), topic_position];
    buf.extend_from_slice(topic.as_slice());
    buf.extend_from_slice(&be_u64(block_height));
    buf.extend_from_slice(&be_u32(tx_index));
    buf.extend_from_slice(&be_u32(log_index));
    buf
}

pub fn log_by_topic_range(
    topic_position: u8,
    topic: B256,
    from_height: u64,
    to_height: u64,
) -> (Vec<u8>, Vec<u8>) {
    let start = log_by_topic_key(topic_position, topic, from_height, 0, 0);
    let end = log_by_topic_key(topic_position, topic, to_height, u32::MAX, u32::MAX);
    (start, end)
}

pub fn wbft_block_extra_key(height: u64) -> Vec<u8> {
    prefixed(Namespace::WbftBlockExtra, &be_u64(height))
}

pub fn wbft_block_extra_range(from_height: u64, to_height: u64) -> (Vec<u8>, Vec<u8>) {
    (wbft_block_extra_key(from_height), wbft_block_extra_key(to_height))
}

pub fn wbft_consensus_data_key(height: u64) -> Vec<u8> {
    prefixed(Namespace::WbftConsensusData, &be_u64(height))
}

pub fn wbft_epoch_key(epoch_number: u64) -> Vec<u8> {
    prefixed(Namespace::WbftEpoch, &be_u64(epoch_number))
}

pub fn wbft_activity_key(block_height: u64, validator: Address) -> Vec<u8> {
    let mut buf = vec![Namespace::WbftActivity.prefix()];
    buf.extend_from_slice(&be_u64(block_height));
    buf.extend_from_slice(validator.as_slice());
    buf
}

pub fn wbft_activity_range(from_height: u64, to_height: u64) -> (Vec<u8>, Vec<u8>) {
    let start = {
        let mut b = vec![Namespace::WbftActivity.prefix()];
        b.extend_from_slice(&be_u64(from_height));
        b
    };
    let end = {
        let mut b = vec![Namespace::WbftActivity.prefix()];
        b.extend_from_slice(&be_u64(to_height));
        b.extend_from_slice(&[0xffu8; 20]);
        b
    };
    (start, end)
}

/// `namespace || tx_hash || from || to` — optional internal-transfer
/// index row (spec §4.3), written only when a trace source is wired in.
pub fn internal_tx_key(tx_hash: B256, from: Address, to: Address) -> Vec<u8> {
    let mut buf = vec![Namespace::InternalTx.prefix()];
    buf.extend_from_slice(tx_hash.as_slice());
    buf.extend_from_slice(from.as_slice());
    buf.extend_from_slice(to.as_slice());
    buf
}

fn prefixed(ns: Namespace, rest: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + rest.len());
    buf.push(ns.prefix());
    buf.extend_from_slice(rest);
    buf
}
