//! Manual RLP codec for [`Transaction`], whose on-wire shape depends on
//! `tx_type` in a way `#[derive(RlpEncodable, RlpDecodable)]` can't
//! express directly (its optional fields aren't all contiguous at the
//! struct's tail, unlike [`crate::block::Header`], which derives its
//! codec using `#[rlp(trailing)]`).
//!
//! The storage round-trip contract (spec §4.2: `decode(encode(x)) == x`
//! for every `Block`, `Transaction`, `Receipt`, `Log`) only requires
//! that our own encoder and decoder agree with each other, not that we
//! match the upstream chain's wire format bit-for-bit — that translation
//! happens once, when an RPC response is converted into these types.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{Decodable, Encodable, RlpDecodable, RlpEncodable};

use crate::transaction::{AccessListItem, Signature, Transaction};

/// Internal, chain-param-independent tag for `Transaction::tx_type`,
/// used only inside this crate's own RLP encoding. Wire-level type byte
/// mapping (which depends on `ChainParams`) happens at the RPC boundary,
/// not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, RlpEncodable, RlpDecodable)]
struct TxTypeTag(u8);

impl From<crate::tx_type::TxType> for TxTypeTag {
    fn from(t: crate::tx_type::TxType) -> Self {
        use crate::tx_type::TxType::*;
        TxTypeTag(match t {
            Legacy => 0,
            AccessList => 1,
            DynamicFee => 2,
            FeeDelegatedDynamicFee => 3,
        })
    }
}

impl TxTypeTag {
    fn into_tx_type(self) -> alloy_rlp::Result<crate::tx_type::TxType> {
        use crate::tx_type::TxType::*;
        Ok(match self.0 {
            0 => Legacy,
            1 => AccessList,
            2 => DynamicFee,
            3 => FeeDelegatedDynamicFee,
            _ => return Err(alloy_rlp::Error::Custom("unknown tx type tag")),
        })
    }
}

/// Flat RLP shape for a `Transaction`: tag, then every field in a fixed
/// slot order; fields that don't apply to this `tx_type` are filled
/// with their zero value, and their presence is carried by a `has_*`
/// flag placed just ahead of them.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
struct TxRlp {
    tag: TxTypeTag,
    hash: B256,
    nonce: u64,
    sender: Address,
    has_to: bool,
    to: Address,
    value: U256,
    gas_limit: u64,
    has_gas_price: bool,
    gas_price: U256,
    has_fee_caps: bool,
    max_fee_per_gas: U256,
    max_priority_fee_per_gas: U256,
    input: Bytes,
    access_list: Vec<AccessListItem>,
    signature: Signature,
    has_fee_payer: bool,
    fee_payer: Address,
    fee_payer_signature: Signature,
    has_recovered_sender: bool,
    recovered_sender: Address,
}

impl Encodable for Transaction {
    fn encode(&self, out: &mut dyn bytes::BufMut) {
        let flat = TxRlp {
            tag: self.tx_type.into(),
            hash: self.hash,
            nonce: self.nonce,
            sender: self.sender,
            has_to: self.to.is_some(),
            to: self.to.unwrap_or_default(),
            value: self.value,
            gas_limit: self.gas_limit,
            has_gas_price: self.gas_price.is_some(),
            gas_price: self.gas_price.unwrap_or_default(),
            has_fee_caps: self.max_fee_per_gas.is_some(),
            max_fee_per_gas: self.max_fee_per_gas.unwrap_or_default(),
            max_priority_fee_per_gas: self.max_priority_fee_per_gas.unwrap_or_default(),
            input: self.input.clone(),
            access_list: self.access_list.clone(),
            signature: self.signature,
            has_fee_payer: self.fee_payer.is_some(),
            fee_payer: self.fee_payer.unwrap_or_default(),
            fee_payer_signature: self.fee_payer_signature.unwrap_or(Signature {
                v: 0,
                r: U256::ZERO,
                s: U256::ZERO,
            }),
            has_recovered_sender: self.recovered_sender.is_some(),
            recovered_sender: self.recovered_sender.unwrap_or_default(),
        };
        flat.encode(out);
    }

    fn length(&self) -> usize {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf.len()
    }
}

impl Decodable for Transaction {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let flat = TxRlp::decode(buf)?;
        Ok(Transaction {
            hash: flat.hash,
            tx_type: flat.tag.into_tx_type()?,
            nonce: flat.nonce,
            sender: flat.sender,
            to: flat.has_to.then_some(flat.to),
            value: flat.value,
            gas_limit: flat.gas_limit,
            gas_price: flat.has_gas_price.then_some(flat.gas_price),
            max_fee_per_gas: flat.has_fee_caps.then_some(flat.max_fee_per_gas),
            max_priority_fee_per_gas: flat.has_fee_caps.then_some(flat.max_priority_fee_per_gas),
            input: flat.input,
            access_list: flat.access_list,
            signature: flat.signature,
            fee_payer: flat.has_fee_payer.then_some(flat.fee_payer),
            fee_payer_signature: flat.has_fee_payer.then_some(flat.fee_payer_signature),
            recovered_sender: flat.has_recovered_sender.then_some(flat.recovered_sender),
        })
    }
}
