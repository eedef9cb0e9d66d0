use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Chain parameters that are configuration, not constants (spec §9 open
/// question: the fee-delegated type number is chain-specific).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    /// Number of blocks per WBFT epoch. 10 in tests, chain-specific in
    /// production (spec §4.4).
    pub epoch_length: u64,
    /// The transaction type byte used for fee-delegated dynamic-fee
    /// transactions. The source pins `0x16` (22); kept symbolic here.
    pub fee_delegated_dynamic_fee_type: u8,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self { epoch_length: 10, fee_delegated_dynamic_fee_type: 0x16 }
    }
}

/// Transaction envelope kind (spec §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum TxType {
    /// Pre-EIP-2718 legacy transaction.
    Legacy,
    /// EIP-2930 access-list transaction.
    AccessList,
    /// EIP-1559 dynamic-fee transaction.
    DynamicFee,
    /// Chain-specific fee-delegated dynamic-fee transaction (type 22 on
    /// the source chain). The fee payer, not the sender, pays gas.
    FeeDelegatedDynamicFee,
}

impl TxType {
    /// Maps a raw EIP-2718 type byte to a [`TxType`] using the chain's
    /// configured fee-delegated type number.
    pub fn from_byte(byte: u8, params: &ChainParams) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Legacy),
            0x01 => Some(Self::AccessList),
            0x02 => Some(Self::DynamicFee),
            b if b == params.fee_delegated_dynamic_fee_type => Some(Self::FeeDelegatedDynamicFee),
            _ => None,
        }
    }

    /// Maps this [`TxType`] back to its raw EIP-2718 type byte.
    pub fn to_byte(self, params: &ChainParams) -> u8 {
        match self {
            Self::Legacy => 0x00,
            Self::AccessList => 0x01,
            Self::DynamicFee => 0x02,
            Self::FeeDelegatedDynamicFee => params.fee_delegated_dynamic_fee_type,
        }
    }
}
