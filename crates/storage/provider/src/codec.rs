//! Thin RLP (de)serialization wrappers used when moving the core types
//! in and out of the KV engine's byte-value slots (spec §4.2: "decode
//! (encode(x)) == x for every Block, Transaction, Receipt, and Log").

use alloy_rlp::{Decodable, Encodable};

use crate::error::{ProviderError, ProviderResult};

pub fn encode<T: Encodable>(value: &T) -> Vec<u8> {
    let mut buf = Vec::with_capacity(value.length());
    value.encode(&mut buf);
    buf
}

pub fn decode<T: Decodable>(bytes: &[u8]) -> ProviderResult<T> {
    let mut slice = bytes;
    T::decode(&mut slice).map_err(|e| ProviderError::Decode(e.to_string()))
}
