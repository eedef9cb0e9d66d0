//! Extra-field (de)serialization (spec §4.4): the first 32 bytes are a
//! raw vanity prefix, never RLP-encoded; the remainder is
//! `WbftExtraRlp`.

use alloy_primitives::{Bytes, FixedBytes};
use alloy_rlp::{Decodable, Encodable};

use crate::error::{WbftError, WbftResult};
use crate::types::{WbftExtra, WbftExtraRlp};

const VANITY_LEN: usize = 32;

/// Parses a header's raw Extra field into a [`WbftExtra`] (spec §4.4).
/// Requires `extra.len() >= 32`; any shorter input, or an RLP decode
/// failure on the remainder, is a [`WbftError::MalformedExtra`] —
/// callers (the fetcher) log it and skip consensus indexing for the
/// block without failing the block's own persistence.
pub fn parse_wbft_extra(extra: &Bytes) -> WbftResult<WbftExtra> {
    if extra.len() < VANITY_LEN {
        return Err(WbftError::MalformedExtra(format!(
            "extra field is {} bytes, need at least {VANITY_LEN} for the vanity prefix",
            extra.len()
        )));
    }

    let vanity = FixedBytes::<32>::from_slice(&extra[..VANITY_LEN]);
    let mut rest = &extra[VANITY_LEN..];
    let rlp = WbftExtraRlp::decode(&mut rest).map_err(|e| WbftError::MalformedExtra(e.to_string()))?;

    Ok(WbftExtra {
        vanity,
        randao_reveal: rlp.randao_reveal,
        previous_round: rlp.previous_round,
        current_round: rlp.current_round,
        previous_prepared_seal: rlp.previous_prepared_seal,
        previous_committed_seal: rlp.previous_committed_seal,
        current_prepared_seal: rlp.current_prepared_seal,
        current_committed_seal: rlp.current_committed_seal,
        gas_tip: rlp.gas_tip,
        epoch_info: rlp.epoch_info,
    })
}

/// Inverse of [`parse_wbft_extra`]: `vanity` raw bytes followed by the
/// RLP encoding of the remaining fields.
pub fn encode_wbft_extra(extra: &WbftExtra) -> Bytes {
    let rlp = WbftExtraRlp {
        randao_reveal: extra.randao_reveal,
        previous_round: extra.previous_round,
        current_round: extra.current_round,
        previous_prepared_seal: extra.previous_prepared_seal.clone(),
        previous_committed_seal: extra.previous_committed_seal.clone(),
        current_prepared_seal: extra.current_prepared_seal.clone(),
        current_committed_seal: extra.current_committed_seal.clone(),
        gas_tip: extra.gas_tip,
        epoch_info: extra.epoch_info.clone(),
    };

    let mut buf = extra.vanity.as_slice().to_vec();
    rlp.encode(&mut buf);
    Bytes::from(buf)
}
