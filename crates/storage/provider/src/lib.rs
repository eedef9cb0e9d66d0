//! Canonical block/receipt store (spec §4.2, component B).

pub mod codec;
pub mod error;
pub mod provider;
pub mod traits;

pub use error::{ProviderError, ProviderResult};
pub use provider::Provider;
pub use traits::{BlockReader, BlockWriter};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::{Address, Bloom, Bytes, B256, U256};
    use indexer_db::MdbxDatabase;
    use indexer_primitives::{
        block::{Block, Header},
        receipt::{Log, Receipt},
        transaction::{Signature, Transaction, TxLocation},
        tx_type::TxType,
    };

    use super::*;

    fn sample_header(height: u64, parent_hash: B256) -> Header {
        Header {
            height,
            hash: B256::repeat_byte(height as u8 + 1),
            parent_hash,
            timestamp: 1_700_000_000 + height,
            miner: Address::repeat_byte(0xaa),
            gas_limit: 30_000_000,
            gas_used: 21_000,
            extra_data: Bytes::from_static(b"vanity-prefix-32-bytes-padding-x"),
            logs_bloom: Bloom::default(),
            transactions_root: B256::ZERO,
            receipts_root: B256::ZERO,
            state_root: B256::ZERO,
            base_fee_per_gas: None,
            withdrawals_root: None,
            blob_gas_used: None,
            excess_blob_gas: None,
        }
    }

    fn sample_tx(hash: B256, sender: Address) -> Transaction {
        Transaction {
            hash,
            tx_type: TxType::Legacy,
            nonce: 0,
            sender,
            to: Some(Address::repeat_byte(0x02)),
            value: U256::from(1u64),
            gas_limit: 21_000,
            gas_price: Some(U256::from(1u64)),
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            input: Bytes::new(),
            access_list: vec![],
            signature: Signature { v: 27, r: U256::from(1u64), s: U256::from(1u64) },
            fee_payer: None,
            fee_payer_signature: None,
            recovered_sender: Some(sender),
        }
    }

    fn sample_receipt(tx_hash: B256, tx_index: u32, block_height: u64) -> Receipt {
        Receipt {
            tx_hash,
            tx_index,
            block_height,
            success: true,
            cumulative_gas_used: 21_000,
            gas_used: 21_000,
            effective_gas_price: U256::from(1u64),
            logs: vec![Log {
                block_number: block_height,
                tx_index,
                log_index: 0,
                address: Address::repeat_byte(0x03),
                topics: vec![B256::repeat_byte(0x04)],
                data: Bytes::new(),
            }],
            logs_bloom: Bloom::default(),
            receipt_type: 0,
            contract_address: None,
        }
    }

    fn provider() -> (tempfile::TempDir, Provider<MdbxDatabase>) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(MdbxDatabase::open(dir.path()).unwrap());
        (dir, Provider::new(db))
    }

    #[test]
    fn latest_height_absent_until_first_block() {
        let (_dir, p) = provider();
        assert!(matches!(p.get_latest_height(), Err(ProviderError::NotFound)));
    }

    #[test]
    fn put_block_with_receipts_round_trips_and_advances_latest_height() {
        let (_dir, p) = provider();
        let sender = Address::repeat_byte(0x01);
        let tx = sample_tx(B256::repeat_byte(0x10), sender);
        let receipt = sample_receipt(tx.hash, 0, 5);
        let header = sample_header(5, B256::ZERO);
        let block = Block { header, transaction_hashes: vec![tx.hash], uncle_hashes: vec![] };

        p.put_block_with_receipts(&block, &[tx.clone()], &[receipt.clone()]).unwrap();

        assert!(p.has_block(5).unwrap());
        assert_eq!(p.get_latest_height().unwrap(), 5);
        assert_eq!(p.get_block(5).unwrap(), block);
        assert_eq!(p.get_block_by_hash(block.hash()).unwrap(), block);

        let (stored_tx, loc) = p.get_transaction(tx.hash).unwrap();
        assert_eq!(stored_tx, tx);
        assert_eq!(loc, TxLocation { block_height: 5, block_hash: block.hash(), index_in_block: 0 });

        assert_eq!(p.get_receipt(tx.hash).unwrap(), receipt);
        assert_eq!(p.get_receipts_by_block(5).unwrap(), vec![receipt]);
    }

    #[test]
    fn latest_height_uses_max_semantics_on_reingest() {
        let (_dir, p) = provider();
        let tx = sample_tx(B256::repeat_byte(0x20), Address::repeat_byte(0x01));
        let receipt = sample_receipt(tx.hash, 0, 10);
        let block = Block {
            header: sample_header(10, B256::ZERO),
            transaction_hashes: vec![tx.hash],
            uncle_hashes: vec![],
        };
        p.put_block_with_receipts(&block, &[tx.clone()], &[receipt.clone()]).unwrap();
        assert_eq!(p.get_latest_height().unwrap(), 10);

        // Re-ingesting a lower, already-committed height is a no-op for
        // `latest_height` (spec §8 boundary case).
        let old_tx = sample_tx(B256::repeat_byte(0x21), Address::repeat_byte(0x02));
        let old_receipt = sample_receipt(old_tx.hash, 0, 3);
        let old_block = Block {
            header: sample_header(3, B256::ZERO),
            transaction_hashes: vec![old_tx.hash],
            uncle_hashes: vec![],
        };
        p.put_block_with_receipts(&old_block, &[old_tx], &[old_receipt]).unwrap();
        assert_eq!(p.get_latest_height().unwrap(), 10);
    }

    #[test]
    fn delete_block_removes_every_artifact() {
        let (_dir, p) = provider();
        let tx = sample_tx(B256::repeat_byte(0x30), Address::repeat_byte(0x01));
        let receipt = sample_receipt(tx.hash, 0, 7);
        let block = Block {
            header: sample_header(7, B256::ZERO),
            transaction_hashes: vec![tx.hash],
            uncle_hashes: vec![],
        };
        p.put_block_with_receipts(&block, &[tx.clone()], &[receipt]).unwrap();

        p.delete_block(7).unwrap();

        assert!(!p.has_block(7).unwrap());
        assert!(matches!(p.get_transaction(tx.hash), Err(ProviderError::NotFound)));
        assert!(matches!(p.get_receipt(tx.hash), Err(ProviderError::NotFound)));
    }
}
