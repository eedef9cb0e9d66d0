//! Upstream JSON-RPC wire types and `0x`-hex parsing (spec §9:
//! "dynamic-typed RPC params" — parse at the boundary into concrete
//! typed values before anything reaches the indexing core).

use alloy_primitives::{Address, Bloom, Bytes, B256, U256};
use indexer_primitives::{
    AccessListItem, Block, ChainParams, Header, Log, Receipt, Signature, Transaction, TxType,
};
use serde::Deserialize;

use crate::error::{RpcError, RpcResult};

pub fn parse_hex_u64(s: &str) -> RpcResult<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).map_err(|e| RpcError::Decode(format!("invalid hex u64 {s:?}: {e}")))
}

pub fn parse_hex_u32(s: &str) -> RpcResult<u32> {
    Ok(parse_hex_u64(s)? as u32)
}

pub fn parse_hex_u8(s: &str) -> RpcResult<u8> {
    Ok(parse_hex_u64(s)? as u8)
}

pub fn parse_hex_u256(s: &str) -> RpcResult<U256> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    U256::from_str_radix(s, 16).map_err(|e| RpcError::Decode(format!("invalid hex u256 {s:?}: {e}")))
}

pub fn parse_hex_bytes(s: &str) -> RpcResult<Bytes> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| RpcError::Decode(format!("invalid hex bytes {s:?}: {e}")))?;
    Ok(Bytes::from(bytes))
}

pub fn parse_hex_address(s: &str) -> RpcResult<Address> {
    let bytes = parse_hex_bytes(s)?;
    if bytes.len() != 20 {
        return Err(RpcError::Decode(format!("address is {} bytes, want 20", bytes.len())));
    }
    Ok(Address::from_slice(&bytes))
}

pub fn parse_hex_b256(s: &str) -> RpcResult<B256> {
    let bytes = parse_hex_bytes(s)?;
    if bytes.len() != 32 {
        return Err(RpcError::Decode(format!("hash is {} bytes, want 32", bytes.len())));
    }
    Ok(B256::from_slice(&bytes))
}

fn parse_hex_bloom(s: &str) -> RpcResult<Bloom> {
    let bytes = parse_hex_bytes(s)?;
    if bytes.len() != 256 {
        return Err(RpcError::Decode(format!("bloom is {} bytes, want 256", bytes.len())));
    }
    Ok(Bloom::from_slice(&bytes))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcEnvelope<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAccessListItem {
    pub address: String,
    #[serde(rename = "storageKeys")]
    pub storage_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLog {
    #[serde(rename = "blockNumber")]
    pub block_number: String,
    #[serde(rename = "transactionIndex")]
    pub transaction_index: String,
    #[serde(rename = "logIndex")]
    pub log_index: String,
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
}

impl RawLog {
    pub fn into_log(self) -> RpcResult<Log> {
        Ok(Log {
            block_number: parse_hex_u64(&self.block_number)?,
            tx_index: parse_hex_u32(&self.transaction_index)?,
            log_index: parse_hex_u32(&self.log_index)?,
            address: parse_hex_address(&self.address)?,
            topics: self.topics.iter().map(|t| parse_hex_b256(t)).collect::<RpcResult<_>>()?,
            data: parse_hex_bytes(&self.data)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTransaction {
    hash: String,
    #[serde(rename = "type")]
    tx_type: Option<String>,
    nonce: String,
    from: String,
    to: Option<String>,
    value: String,
    gas: String,
    #[serde(rename = "gasPrice")]
    gas_price: Option<String>,
    #[serde(rename = "maxFeePerGas")]
    max_fee_per_gas: Option<String>,
    #[serde(rename = "maxPriorityFeePerGas")]
    max_priority_fee_per_gas: Option<String>,
    input: String,
    #[serde(rename = "accessList", default)]
    access_list: Vec<RawAccessListItem>,
    v: String,
    r: String,
    s: String,
    #[serde(rename = "feePayer")]
    fee_payer: Option<String>,
    #[serde(rename = "feePayerV")]
    fee_payer_v: Option<String>,
    #[serde(rename = "feePayerR")]
    fee_payer_r: Option<String>,
    #[serde(rename = "feePayerS")]
    fee_payer_s: Option<String>,
}

impl RawTransaction {
    pub fn into_transaction(self, params: &ChainParams) -> RpcResult<Transaction> {
        let type_byte = match &self.tx_type {
            Some(t) => parse_hex_u8(t)?,
            None => 0x00,
        };
        let tx_type = TxType::from_byte(type_byte, params)
            .ok_or_else(|| RpcError::Decode(format!("unrecognized transaction type byte {type_byte:#x}")))?;

        let fee_payer = self.fee_payer.as_deref().map(parse_hex_address).transpose()?;
        let fee_payer_signature = match (&self.fee_payer_v, &self.fee_payer_r, &self.fee_payer_s) {
            (Some(v), Some(r), Some(s)) => Some(Signature {
                v: parse_hex_u64(v)?,
                r: parse_hex_u256(r)?,
                s: parse_hex_u256(s)?,
            }),
            _ => None,
        };

        Ok(Transaction {
            hash: parse_hex_b256(&self.hash)?,
            tx_type,
            nonce: parse_hex_u64(&self.nonce)?,
            sender: parse_hex_address(&self.from)?,
            to: self.to.as_deref().map(parse_hex_address).transpose()?,
            value: parse_hex_u256(&self.value)?,
            gas_limit: parse_hex_u64(&self.gas)?,
            gas_price: self.gas_price.as_deref().map(parse_hex_u256).transpose()?,
            max_fee_per_gas: self.max_fee_per_gas.as_deref().map(parse_hex_u256).transpose()?,
            max_priority_fee_per_gas: self
                .max_priority_fee_per_gas
                .as_deref()
                .map(parse_hex_u256)
                .transpose()?,
            input: parse_hex_bytes(&self.input)?,
            access_list: self
                .access_list
                .into_iter()
                .map(|item| {
                    Ok(AccessListItem {
                        address: parse_hex_address(&item.address)?,
                        storage_keys: item.storage_keys.iter().map(|k| parse_hex_b256(k)).collect::<RpcResult<_>>()?,
                    })
                })
                .collect::<RpcResult<_>>()?,
            signature: Signature {
                v: parse_hex_u64(&self.v)?,
                r: parse_hex_u256(&self.r)?,
                s: parse_hex_u256(&self.s)?,
            },
            fee_payer,
            fee_payer_signature,
            // Populated later by the fetcher's sender-recovery step
            // (spec §9); the RPC client only carries what upstream sent.
            recovered_sender: None,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBlock {
    number: String,
    hash: String,
    #[serde(rename = "parentHash")]
    parent_hash: String,
    timestamp: String,
    miner: String,
    #[serde(rename = "gasLimit")]
    gas_limit: String,
    #[serde(rename = "gasUsed")]
    gas_used: String,
    #[serde(rename = "extraData")]
    extra_data: String,
    #[serde(rename = "logsBloom")]
    logs_bloom: String,
    #[serde(rename = "transactionsRoot")]
    transactions_root: String,
    #[serde(rename = "receiptsRoot")]
    receipts_root: String,
    #[serde(rename = "stateRoot")]
    state_root: String,
    #[serde(rename = "baseFeePerGas")]
    base_fee_per_gas: Option<String>,
    #[serde(rename = "withdrawalsRoot")]
    withdrawals_root: Option<String>,
    #[serde(rename = "blobGasUsed")]
    blob_gas_used: Option<String>,
    #[serde(rename = "excessBlobGas")]
    excess_blob_gas: Option<String>,
    transactions: Vec<RawTransaction>,
    #[serde(default)]
    uncles: Vec<String>,
}

impl RawBlock {
    /// Splits into the persisted [`Block`] (hashes only) plus the full
    /// transaction bodies, which `indexer-provider`'s `BlockWriter`
    /// needs as a separate argument (see `indexer-provider`'s
    /// documented resolution of the spec's `Block`-carries-hashes-only
    /// shape).
    pub fn into_block_and_transactions(self, params: &ChainParams) -> RpcResult<(Block, Vec<Transaction>)> {
        let transactions = self
            .transactions
            .into_iter()
            .map(|tx| tx.into_transaction(params))
            .collect::<RpcResult<Vec<_>>>()?;

        let header = Header {
            height: parse_hex_u64(&self.number)?,
            hash: parse_hex_b256(&self.hash)?,
            parent_hash: parse_hex_b256(&self.parent_hash)?,
            timestamp: parse_hex_u64(&self.timestamp)?,
            miner: parse_hex_address(&self.miner)?,
            gas_limit: parse_hex_u64(&self.gas_limit)?,
            gas_used: parse_hex_u64(&self.gas_used)?,
            extra_data: parse_hex_bytes(&self.extra_data)?,
            logs_bloom: parse_hex_bloom(&self.logs_bloom)?,
            transactions_root: parse_hex_b256(&self.transactions_root)?,
            receipts_root: parse_hex_b256(&self.receipts_root)?,
            state_root: parse_hex_b256(&self.state_root)?,
            base_fee_per_gas: self.base_fee_per_gas.as_deref().map(parse_hex_u256).transpose()?,
            withdrawals_root: self.withdrawals_root.as_deref().map(parse_hex_b256).transpose()?,
            blob_gas_used: self.blob_gas_used.as_deref().map(parse_hex_u64).transpose()?,
            excess_blob_gas: self.excess_blob_gas.as_deref().map(parse_hex_u64).transpose()?,
        };

        let block = Block {
            transaction_hashes: transactions.iter().map(|t| t.hash).collect(),
            uncle_hashes: self.uncles.iter().map(|h| parse_hex_b256(h)).collect::<RpcResult<_>>()?,
            header,
        };

        Ok((block, transactions))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawReceipt {
    #[serde(rename = "transactionHash")]
    tx_hash: String,
    #[serde(rename = "transactionIndex")]
    tx_index: String,
    #[serde(rename = "blockNumber")]
    block_number: String,
    status: Option<String>,
    #[serde(rename = "cumulativeGasUsed")]
    cumulative_gas_used: String,
    #[serde(rename = "gasUsed")]
    gas_used: String,
    #[serde(rename = "effectiveGasPrice")]
    effective_gas_price: String,
    logs: Vec<RawLog>,
    #[serde(rename = "logsBloom")]
    logs_bloom: String,
    #[serde(rename = "type")]
    receipt_type: Option<String>,
    #[serde(rename = "contractAddress")]
    contract_address: Option<String>,
}

impl RawReceipt {
    pub fn into_receipt(self) -> RpcResult<Receipt> {
        Ok(Receipt {
            tx_hash: parse_hex_b256(&self.tx_hash)?,
            tx_index: parse_hex_u32(&self.tx_index)?,
            block_height: parse_hex_u64(&self.block_number)?,
            success: match &self.status {
                Some(s) => parse_hex_u64(s)? == 1,
                None => true,
            },
            cumulative_gas_used: parse_hex_u64(&self.cumulative_gas_used)?,
            gas_used: parse_hex_u64(&self.gas_used)?,
            effective_gas_price: parse_hex_u256(&self.effective_gas_price)?,
            logs: self.logs.into_iter().map(|l| l.into_log()).collect::<RpcResult<_>>()?,
            logs_bloom: parse_hex_bloom(&self.logs_bloom)?,
            receipt_type: match &self.receipt_type {
                Some(t) => parse_hex_u8(t)?,
                None => 0,
            },
            contract_address: self.contract_address.as_deref().map(parse_hex_address).transpose()?,
        })
    }
}

pub(crate) type RawBlockEnvelope = RpcEnvelope<RawBlock>;
pub(crate) type RawReceiptsEnvelope = RpcEnvelope<Vec<RawReceipt>>;
pub(crate) type RawQuantityEnvelope = RpcEnvelope<String>;
