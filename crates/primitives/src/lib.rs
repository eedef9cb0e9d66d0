//! Core data model for the WBFT EVM indexer (spec §3).
//!
//! This crate holds pure data: block/transaction/receipt/log types,
//! their RLP serialization, the chain-parameter types the rest of the
//! workspace is generic over, the shared error taxonomy (spec §7), and
//! `0x`-hex formatting helpers for the JSON-RPC API boundary (spec §6).
//! It has no storage or network dependencies.

pub mod block;
pub mod error;
pub mod gap;
pub mod hex_quantity;
pub mod receipt;
mod rlp_codec;
pub mod transaction;
pub mod tx_type;

pub use block::{Block, Header};
pub use error::{IndexerError, IndexerResult};
pub use gap::GapRange;
pub use receipt::{Log, Receipt};
pub use transaction::{AccessListItem, Signature, Transaction, TxLocation};
pub use tx_type::{ChainParams, TxType};

pub use alloy_primitives::{Address, Bloom, Bytes, B256, U256};
