use std::sync::Arc;

use alloy_primitives::B256;
use indexer_db::{keys, Batch, Database};
use indexer_primitives::{Block, Receipt, Transaction, TxLocation};

use crate::codec::{decode, encode};
use crate::error::{ProviderError, ProviderResult};
use crate::traits::{BlockReader, BlockWriter};

/// Canonical block/receipt store (spec §4.2, component B), generic over
/// any [`Database`] implementation.
#[derive(Debug, Clone)]
pub struct Provider<DB> {
    db: Arc<DB>,
}

impl<DB: Database> Provider<DB> {
    pub fn new(db: Arc<DB>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Arc<DB> {
        &self.db
    }

    fn read_height_scalar(&self, key: &[u8]) -> ProviderResult<u64> {
        let bytes = self.db.get(key)?;
        if bytes.len() != 8 {
            return Err(ProviderError::Inconsistent("height scalar not 8 bytes".into()));
        }
        Ok(u64::from_be_bytes(bytes.try_into().unwrap()))
    }
}

impl<DB: Database> BlockReader for Provider<DB> {
    fn get_latest_height(&self) -> ProviderResult<u64> {
        self.read_height_scalar(&keys::latest_height_key())
    }

    fn get_block(&self, height: u64) -> ProviderResult<Block> {
        let bytes = self.db.get(&keys::block_height_key(height))?;
        decode(&bytes)
    }

    fn get_block_by_hash(&self, hash: B256) -> ProviderResult<Block> {
        let height = self.read_height_scalar(&keys::block_hash_key(hash))?;
        self.get_block(height)
    }

    fn get_transaction(&self, hash: B256) -> ProviderResult<(Transaction, TxLocation)> {
        let tx_bytes = self.db.get(&keys::tx_hash_key(hash))?;
        let loc_bytes = self.db.get(&keys::tx_location_key(hash))?;
        Ok((decode(&tx_bytes)?, decode(&loc_bytes)?))
    }

    fn get_receipt(&self, tx_hash: B256) -> ProviderResult<Receipt> {
        let bytes = self.db.get(&keys::receipt_key(tx_hash))?;
        decode(&bytes)
    }

    fn get_receipts_by_block(&self, height: u64) -> ProviderResult<Vec<Receipt>> {
        let block = self.get_block(height)?;
        block
            .transaction_hashes
            .iter()
            .map(|hash| self.get_receipt(*hash))
            .collect()
    }

    fn has_block(&self, height: u64) -> ProviderResult<bool> {
        Ok(self.db.has_key(&keys::block_height_key(height))?)
    }
}

impl<DB: Database> BlockWriter for Provider<DB> {
    fn put_block_with_receipts(
        &self,
        block: &Block,
        transactions: &[Transaction],
        receipts: &[Receipt],
    ) -> ProviderResult<()> {
        let height = block.height();
        let batch = self.block_batch(block, transactions, receipts)?;
        self.commit_block_batch(height, batch)
    }

    fn block_batch(
        &self,
        block: &Block,
        transactions: &[Transaction],
        receipts: &[Receipt],
    ) -> ProviderResult<Batch> {
        if transactions.len() != block.transaction_hashes.len() {
            return Err(ProviderError::Inconsistent(
                "transactions length does not match block.transaction_hashes".into(),
            ));
        }
        if receipts.len() != transactions.len() {
            return Err(ProviderError::Inconsistent(
                "receipts length does not match transactions length".into(),
            ));
        }

        let mut batch = Batch::new();
        let height = block.height();
        let hash = block.hash();

        batch.put(keys::block_height_key(height), encode(block));
        batch.put(keys::block_hash_key(hash), height.to_be_bytes().to_vec());

        for (index, (tx, receipt)) in transactions.iter().zip(receipts.iter()).enumerate() {
            if tx.hash != block.transaction_hashes[index] {
                return Err(ProviderError::Inconsistent(
                    "transaction order does not match block.transaction_hashes".into(),
                ));
            }
            batch.put(keys::tx_hash_key(tx.hash), encode(tx));
            batch.put(
                keys::tx_location_key(tx.hash),
                encode(&TxLocation {
                    block_height: height,
                    block_hash: hash,
                    index_in_block: index as u32,
                }),
            );
            batch.put(keys::receipt_key(tx.hash), encode(receipt));

            for log in &receipt.logs {
                batch.put(
                    keys::log_key(height, index as u32, log.log_index),
                    encode(log),
                );
            }
        }

        Ok(batch)
    }

    fn commit_block_batch(&self, height: u64, mut batch: Batch) -> ProviderResult<()> {
        let current = match self.get_latest_height() {
            Ok(h) => Some(h),
            Err(ProviderError::NotFound) => None,
            Err(e) => return Err(e),
        };
        // `max` semantics: re-ingesting an already-committed height never
        // regresses `latest_height` (spec §4.5, idempotent no-op case).
        let next = current.map_or(height, |c| c.max(height));
        batch.put(keys::latest_height_key(), next.to_be_bytes().to_vec());
        Ok(batch.commit(&*self.db)?)
    }

    fn delete_block(&self, height: u64) -> ProviderResult<()> {
        let block = self.get_block(height)?;
        let mut batch = Batch::new();

        batch.delete(keys::block_height_key(height));
        batch.delete(keys::block_hash_key(block.hash()));

        for tx_hash in &block.transaction_hashes {
            batch.delete(keys::tx_hash_key(*tx_hash));
            batch.delete(keys::tx_location_key(*tx_hash));
            batch.delete(keys::receipt_key(*tx_hash));
        }

        let (start, end) = keys::log_key_range(height);
        for (key, _) in self.db.scan(&start, &end)? {
            batch.delete(key);
        }

        Ok(batch.commit(&*self.db)?)
    }
}
