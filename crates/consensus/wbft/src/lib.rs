//! WBFT consensus Extra parser and consensus index store (spec §4.4,
//! component D): binary decoding of consensus Extra headers, signer
//! bitmap resolution, epoch reconstruction, and per-validator
//! participation tracking.

pub mod bitmap;
pub mod builder;
pub mod codec;
pub mod error;
pub mod parse;
pub mod reader;
pub mod types;

pub use bitmap::{decode_sealers_bitmap, encode_sealers_bitmap};
pub use builder::WbftBuilder;
pub use error::{WbftError, WbftResult};
pub use parse::{encode_wbft_extra, parse_wbft_extra};
pub use reader::WbftReader;
pub use types::{
    AggregatedSeal, BlsPublicKey, BlsSignature, Candidate, ConsensusData, EpochInfo,
    RoundChangeAnalysis, ValidatorSigningActivity, ValidatorStats, WbftExtra,
};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::{Address, Bytes, FixedBytes, U256};
    use indexer_db::{Batch, Database, MdbxDatabase};
    use indexer_primitives::{ChainParams, Header};

    use super::*;
    use crate::types::{AggregatedSeal as Seal, Candidate};

    fn db() -> (tempfile::TempDir, Arc<MdbxDatabase>) {
        let dir = tempfile::tempdir().unwrap();
        (dir, Arc::new(MdbxDatabase::open(dir.path()).unwrap()))
    }

    fn roster(addresses: &[Address]) -> EpochInfo {
        EpochInfo {
            epoch_number: 0,
            candidates: addresses.iter().map(|&a| Candidate { address: a, diligence: U256::from(1u64) }).collect(),
            validators: (0..addresses.len() as u32).collect(),
            bls_public_keys: addresses.iter().map(|_| FixedBytes::<48>::repeat_byte(0)).collect(),
        }
    }

    fn header_with_extra(height: u64, extra: &WbftExtra) -> Header {
        Header {
            height,
            hash: alloy_primitives::B256::repeat_byte(height as u8),
            parent_hash: alloy_primitives::B256::ZERO,
            timestamp: 1_700_000_000 + height,
            miner: Address::ZERO,
            gas_limit: 30_000_000,
            gas_used: 0,
            extra_data: encode_wbft_extra(extra),
            logs_bloom: alloy_primitives::Bloom::default(),
            transactions_root: alloy_primitives::B256::ZERO,
            receipts_root: alloy_primitives::B256::ZERO,
            state_root: alloy_primitives::B256::ZERO,
            base_fee_per_gas: None,
            withdrawals_root: None,
            blob_gas_used: None,
            excess_blob_gas: None,
        }
    }

    fn extra_with(epoch_info: Option<EpochInfo>, commit_idx: &[u32], n: usize) -> WbftExtra {
        let committed = Seal {
            sealers: Bytes::from(encode_sealers_bitmap(commit_idx, n)),
            signature: FixedBytes::<96>::repeat_byte(0),
        };
        let all = Seal {
            sealers: Bytes::from(encode_sealers_bitmap(&(0..n as u32).collect::<Vec<_>>(), n)),
            signature: FixedBytes::<96>::repeat_byte(0),
        };
        WbftExtra {
            vanity: FixedBytes::<32>::repeat_byte(0x01),
            randao_reveal: FixedBytes::<96>::repeat_byte(0x02),
            previous_round: 0,
            current_round: 0,
            previous_prepared_seal: all.clone(),
            previous_committed_seal: all.clone(),
            current_prepared_seal: all,
            current_committed_seal: committed,
            gas_tip: U256::ZERO,
            epoch_info,
        }
    }

    #[test]
    fn validators_all_signing_every_block_have_full_participation() {
        let (_dir, db) = db();
        let validators = [Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3)];
        let chain_params = ChainParams { epoch_length: 1000, fee_delegated_dynamic_fee_type: 0x16 };
        let builder = WbftBuilder::new(db.clone(), chain_params);

        for height in 100..106u64 {
            let epoch_info = if height == 100 { Some(roster(&validators)) } else { None };
            let extra = extra_with(epoch_info, &[0, 1, 2], 3);
            let header = header_with_extra(height, &extra);
            let mut batch = Batch::new();
            builder.index_block(&mut batch, &header).unwrap();
            batch.commit(&*db).unwrap();
        }

        let reader = WbftReader::new(db);
        let stats = reader.validator_stats(validators[0], 100, 105).unwrap();
        assert_eq!(stats.total_blocks, 6);
        assert_eq!(stats.commits_signed, 6);
        assert_eq!(stats.commits_missed, 0);
        assert!((stats.participation_rate_percent() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn validator_missing_two_commits_has_66_67_percent_participation() {
        let (_dir, db) = db();
        let validators = [Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3)];
        let chain_params = ChainParams { epoch_length: 1000, fee_delegated_dynamic_fee_type: 0x16 };
        let builder = WbftBuilder::new(db.clone(), chain_params);

        for height in 100..106u64 {
            let epoch_info = if height == 100 { Some(roster(&validators)) } else { None };
            // validator #2 (roster index 1) absent from commits of 100 and 103
            let commit_idx: Vec<u32> = if height == 100 || height == 103 { vec![0, 2] } else { vec![0, 1, 2] };
            let extra = extra_with(epoch_info, &commit_idx, 3);
            let header = header_with_extra(height, &extra);
            let mut batch = Batch::new();
            builder.index_block(&mut batch, &header).unwrap();
            batch.commit(&*db).unwrap();
        }

        let reader = WbftReader::new(db);
        let stats = reader.validator_stats(validators[1], 100, 105).unwrap();
        assert_eq!(stats.total_blocks, 6);
        assert_eq!(stats.commits_signed, 4);
        assert_eq!(stats.commits_missed, 2);
        assert!((stats.participation_rate_percent() - 66.666_666_7).abs() < 1e-6);
    }

    #[test]
    fn consensus_data_health_flag_uses_two_thirds_threshold() {
        let (_dir, db) = db();
        let validators = [Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3)];
        let chain_params = ChainParams { epoch_length: 1000, fee_delegated_dynamic_fee_type: 0x16 };
        let builder = WbftBuilder::new(db.clone(), chain_params);

        let extra = extra_with(Some(roster(&validators)), &[0, 1], 3);
        let header = header_with_extra(50, &extra);
        let mut batch = Batch::new();
        builder.index_block(&mut batch, &header).unwrap();
        batch.commit(&*db).unwrap();

        let reader = WbftReader::new(db);
        let data = reader.consensus_data(50).unwrap();
        assert_eq!(data.commit_count, 2);
        assert_eq!(data.roster_size, 3);
        assert!(data.is_healthy);
        assert_eq!(data.missed_commit.len(), 1);
    }

    #[test]
    fn malformed_extra_is_skipped_without_error() {
        let (_dir, db) = db();
        let chain_params = ChainParams::default();
        let builder = WbftBuilder::new(db.clone(), chain_params);

        let header = Header {
            height: 1,
            hash: alloy_primitives::B256::repeat_byte(1),
            parent_hash: alloy_primitives::B256::ZERO,
            timestamp: 0,
            miner: Address::ZERO,
            gas_limit: 0,
            gas_used: 0,
            extra_data: Bytes::from_static(b"too short"),
            logs_bloom: alloy_primitives::Bloom::default(),
            transactions_root: alloy_primitives::B256::ZERO,
            receipts_root: alloy_primitives::B256::ZERO,
            state_root: alloy_primitives::B256::ZERO,
            base_fee_per_gas: None,
            withdrawals_root: None,
            blob_gas_used: None,
            excess_blob_gas: None,
        };

        let mut batch = Batch::new();
        assert!(builder.index_block(&mut batch, &header).is_ok());
        assert!(batch.is_empty());
    }
}
