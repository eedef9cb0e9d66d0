use alloy_rlp::{Decodable, Encodable};

use crate::error::{WbftError, WbftResult};

pub fn encode<T: Encodable>(value: &T) -> Vec<u8> {
    let mut buf = Vec::with_capacity(value.length());
    value.encode(&mut buf);
    buf
}

pub fn decode<T: Decodable>(bytes: &[u8]) -> WbftResult<T> {
    let mut slice = bytes;
    T::decode(&mut slice).map_err(|e| WbftError::Decode(e.to_string()))
}
