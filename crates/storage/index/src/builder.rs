//! Per-block derived index construction (spec §4.3, component C). Runs
//! for each block before `META/latest_height` is advanced; every write
//! here is appended to the same [`Batch`] component B commits, so a
//! crash can never leave a block persisted without its derived indices
//! or vice versa.

use alloy_primitives::{Address, U256};
use indexer_db::{keys, Batch};
use indexer_primitives::{Block, Receipt, Transaction, TxType};

use crate::codec::encode;
use crate::error::IndexResult;
use crate::types::{ContractCreation, Erc20Transfer, Erc721Transfer, TRANSFER_EVENT_SIGNATURE};

/// Builds the component-C writes for one block and appends them to
/// `batch`. Callers obtain `batch` from `BlockWriter::block_batch` and
/// commit once via `BlockWriter::commit_block_batch` (spec §4.3: "same
/// atomic batch as B's block write").
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexBuilder;

impl IndexBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn index_block(
        &self,
        batch: &mut Batch,
        block: &Block,
        transactions: &[Transaction],
        receipts: &[Receipt],
    ) -> IndexResult<()> {
        let height = block.height();
        let timestamp = block.header.timestamp;

        for (tx_index, (tx, receipt)) in transactions.iter().zip(receipts.iter()).enumerate() {
            self.index_transaction(batch, height, timestamp, tx_index as u32, tx, receipt);
        }

        Ok(())
    }

    pub(crate) fn index_transaction(
        &self,
        batch: &mut Batch,
        height: u64,
        timestamp: u64,
        tx_index: u32,
        tx: &Transaction,
        receipt: &Receipt,
    ) {
        self.index_address_tx(batch, height, tx_index, tx);
        self.index_contract_creation(batch, height, timestamp, tx_index, tx, receipt);

        for log in &receipt.logs {
            self.index_log_filter_rows(batch, height, tx_index, log);
            self.index_transfer(batch, height, tx_index, log);
        }
    }

    /// Address-of-transaction index: sender, recipient (if distinct),
    /// and — only for fee-delegated transactions — the fee payer (if
    /// distinct from both) (spec §4.3 item 1).
    fn index_address_tx(&self, batch: &mut Batch, height: u64, tx_index: u32, tx: &Transaction) {
        let mut seen = Vec::with_capacity(3);

        let mut insert = |address: Address| {
            if seen.contains(&address) {
                return;
            }
            seen.push(address);
            batch.put(
                keys::address_tx_key(address, height, tx_index),
                tx.hash.as_slice().to_vec(),
            );
        };

        insert(tx.sender);
        if let Some(to) = tx.to {
            insert(to);
        }
        if tx.tx_type == TxType::FeeDelegatedDynamicFee {
            if let Some(fee_payer) = tx.fee_payer {
                insert(fee_payer);
            }
        }
    }

    /// Contract creation record plus creator index (spec §4.3 item 2).
    /// `deployment_order` packs `(u64::MAX - height, tx_index)` into one
    /// `u64` so a single ascending cursor walk yields newest-first order
    /// without a separate monotonic counter; it assumes fewer than
    /// 2^20 transactions per block.
    fn index_contract_creation(
        &self,
        batch: &mut Batch,
        height: u64,
        timestamp: u64,
        tx_index: u32,
        tx: &Transaction,
        receipt: &Receipt,
    ) {
        if !tx.is_contract_creation() {
            return;
        }
        let Some(contract_address) = receipt.contract_address else {
            return;
        };

        let record = ContractCreation {
            creator: tx.sender,
            tx_hash: tx.hash,
            block_height: height,
            timestamp,
            bytecode_size: tx.input.len() as u64,
        };
        batch.put(keys::contract_creation_key(contract_address), encode(&record));

        let deployment_order = ((u64::MAX - height) << 20) | (tx_index as u64 & 0xf_ffff);
        batch.put(
            keys::creator_index_key(tx.sender, deployment_order),
            contract_address.as_slice().to_vec(),
        );
    }

    /// Log filter index: by-block, by-address, and by-topic-position
    /// reverse lookups (spec §4.3 item 4).
    fn index_log_filter_rows(
        &self,
        batch: &mut Batch,
        height: u64,
        tx_index: u32,
        log: &indexer_primitives::Log,
    ) {
        batch.put(
            keys::log_by_block_key(height, tx_index, log.log_index),
            Vec::new(),
        );
        batch.put(
            keys::log_by_address_key(log.address, height, tx_index, log.log_index),
            Vec::new(),
        );
        for (position, topic) in log.topics.iter().enumerate().take(4) {
            batch.put(
                keys::log_by_topic_key(position as u8, *topic, height, tx_index, log.log_index),
                Vec::new(),
            );
        }
    }

    /// ERC-20/ERC-721 `Transfer` detection and indexing (spec §4.3 item
    /// 3). Malformed candidates (wrong topic count already filtered;
    /// truncated `data`) are skipped with a warning, never an error —
    /// a single bad log must not block the rest of the block's indexing.
    fn index_transfer(
        &self,
        batch: &mut Batch,
        height: u64,
        tx_index: u32,
        log: &indexer_primitives::Log,
    ) {
        if log.topic(0) != Some(TRANSFER_EVENT_SIGNATURE) {
            return;
        }

        let token = log.address;
        let Some(from) = log.topic(1).map(topic_to_address) else { return };
        let Some(to) = log.topic(2).map(topic_to_address) else { return };

        match log.topics.len() {
            3 => {
                if log.data.len() < 32 {
                    tracing::warn!(
                        block = height,
                        tx_index,
                        log_index = log.log_index,
                        "malformed ERC-20 transfer log: data shorter than 32 bytes"
                    );
                    return;
                }
                let value = U256::from_be_slice(&log.data[..32]);
                let record = Erc20Transfer {
                    token,
                    from,
                    to,
                    value,
                    block_height: height,
                    tx_index,
                    log_index: log.log_index,
                };
                self.write_transfer_rows(
                    batch,
                    keys::Namespace::Erc20Transfer,
                    keys::Namespace::Erc20TransferByToken,
                    token,
                    from,
                    to,
                    height,
                    tx_index,
                    log.log_index,
                    encode(&record),
                );
            }
            4 => {
                let token_id = U256::from_be_slice(log.topics[3].as_slice());
                let record = Erc721Transfer {
                    token,
                    from,
                    to,
                    token_id,
                    block_height: height,
                    tx_index,
                    log_index: log.log_index,
                };
                self.write_transfer_rows(
                    batch,
                    keys::Namespace::Erc721Transfer,
                    keys::Namespace::Erc721TransferByToken,
                    token,
                    from,
                    to,
                    height,
                    tx_index,
                    log.log_index,
                    encode(&record),
                );
                batch.put(keys::erc721_owner_key(token, token_id), to.as_slice().to_vec());
            }
            _ => {
                tracing::warn!(
                    block = height,
                    log_index = log.log_index,
                    topics = log.topics.len(),
                    "log matches Transfer signature with an unsupported topic count"
                );
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn write_transfer_rows(
        &self,
        batch: &mut Batch,
        ns: keys::Namespace,
        ns_by_token: keys::Namespace,
        token: Address,
        from: Address,
        to: Address,
        height: u64,
        tx_index: u32,
        log_index: u32,
        value: Vec<u8>,
    ) {
        batch.put(keys::transfer_key(ns, token, from, height, tx_index, log_index), value.clone());
        if to != from {
            batch.put(keys::transfer_key(ns, token, to, height, tx_index, log_index), value.clone());
        }
        batch.put(
            keys::transfer_by_token_key(ns_by_token, token, height, tx_index, log_index),
            value,
        );
    }
}

fn topic_to_address(topic: alloy_primitives::B256) -> Address {
    Address::from_slice(&topic.as_slice()[12..32])
}
