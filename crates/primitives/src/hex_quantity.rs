//! `0x`-hex encoding helpers for the JSON-RPC API boundary (spec §6):
//! numeric fields are lowercase `0x…` hex without leading zeros (except
//! `0x0`); addresses and hashes are `0x`-prefixed lowercase hex.
//!
//! These are pure formatting helpers. Parsing caller-supplied
//! string-or-number block tags into concrete typed values (spec §9,
//! "dynamic-typed RPC params") is the API layer's job, not the core's —
//! the core only ever produces these strings, it never consumes them.

use alloy_primitives::U256;

/// Formats a `u64` as a minimal-width `0x` quantity.
pub fn hex_u64(v: u64) -> String {
    format!("0x{v:x}")
}

/// Formats a [`U256`] as a minimal-width `0x` quantity.
pub fn hex_u256(v: U256) -> String {
    if v.is_zero() {
        "0x0".to_string()
    } else {
        format!("0x{v:x}")
    }
}

/// Formats raw bytes (an address, hash, or topic) as `0x`-prefixed
/// lowercase hex, full width, no stripped leading zeros.
pub fn hex_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
