//! Upstream JSON-RPC client contract (spec §6): what the fetcher
//! pipeline needs from an upstream EVM node, plus an HTTP
//! implementation.

pub mod client;
pub mod error;
pub mod http;
mod wire;

pub use client::RpcClient;
pub use error::{RpcError, RpcResult};
pub use http::HttpRpcClient;
pub use wire::{parse_hex_address, parse_hex_b256, parse_hex_bytes, parse_hex_u256, parse_hex_u64};
