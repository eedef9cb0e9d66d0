//! Read side of the derived indices: pagination over the rows
//! [`crate::builder::IndexBuilder`] writes (spec §4.3).

use alloy_primitives::{Address, B256, U256};
use indexer_db::{keys, Database};

use crate::codec::decode;
use crate::error::IndexResult;
use crate::types::{ContractCreation, Erc20Transfer, Erc721Transfer, LogPosition, Page, PageParams};

/// Queries over the component-C indices, generic over any [`Database`].
#[derive(Debug, Clone)]
pub struct IndexReader<DB> {
    db: std::sync::Arc<DB>,
}

impl<DB: Database> IndexReader<DB> {
    pub fn new(db: std::sync::Arc<DB>) -> Self {
        Self { db }
    }

    /// Transaction hashes touching `address`, newest block first then
    /// ascending tx index within a block (spec §4.3 default order),
    /// paginated per [`PageParams`]'s server-side cap.
    pub fn transactions_by_address(&self, address: Address, page: PageParams) -> IndexResult<Page<B256>> {
        let prefix = keys::address_tx_prefix(address);
        let rows = self.db.scan(&prefix, &upper_bound(&prefix))?;
        paginate(rows, page, |_, value| Ok(B256::from_slice(&value)))
    }

    /// Contract addresses deployed by `creator`, in deployment order
    /// (spec §3.1).
    pub fn contracts_by_creator(&self, creator: Address, page: PageParams) -> IndexResult<Page<Address>> {
        let prefix = keys::creator_index_prefix(creator);
        let rows = self.db.scan(&prefix, &upper_bound(&prefix))?;
        paginate(rows, page, |_, value| Ok(Address::from_slice(&value)))
    }

    pub fn contract_creation(&self, contract_address: Address) -> IndexResult<ContractCreation> {
        let bytes = self.db.get(&keys::contract_creation_key(contract_address))?;
        decode(&bytes)
    }

    /// ERC-20 transfers involving `holder` for `token`, newest first.
    pub fn erc20_transfers_by_holder(
        &self,
        token: Address,
        holder: Address,
        page: PageParams,
    ) -> IndexResult<Page<Erc20Transfer>> {
        let prefix = keys::transfer_prefix(keys::Namespace::Erc20Transfer, token, Some(holder));
        let rows = self.db.scan(&prefix, &upper_bound(&prefix))?;
        paginate(rows, page, |_, value| decode(&value))
    }

    /// ERC-20 transfers for `token` regardless of counterparty, newest
    /// first (the by-token mirror, spec §3.1).
    pub fn erc20_transfers_by_token(&self, token: Address, page: PageParams) -> IndexResult<Page<Erc20Transfer>> {
        let prefix = keys::transfer_prefix(keys::Namespace::Erc20TransferByToken, token, None);
        let rows = self.db.scan(&prefix, &upper_bound(&prefix))?;
        paginate(rows, page, |_, value| decode(&value))
    }

    pub fn erc721_transfers_by_holder(
        &self,
        token: Address,
        holder: Address,
        page: PageParams,
    ) -> IndexResult<Page<Erc721Transfer>> {
        let prefix = keys::transfer_prefix(keys::Namespace::Erc721Transfer, token, Some(holder));
        let rows = self.db.scan(&prefix, &upper_bound(&prefix))?;
        paginate(rows, page, |_, value| decode(&value))
    }

    pub fn erc721_transfers_by_token(&self, token: Address, page: PageParams) -> IndexResult<Page<Erc721Transfer>> {
        let prefix = keys::transfer_prefix(keys::Namespace::Erc721TransferByToken, token, None);
        let rows = self.db.scan(&prefix, &upper_bound(&prefix))?;
        paginate(rows, page, |_, value| decode(&value))
    }

    /// Current owner of `(token, token_id)`, last updated by the most
    /// recent ERC-721 `Transfer` (spec §3.1).
    pub fn erc721_owner(&self, token: Address, token_id: U256) -> IndexResult<Address> {
        let bytes = self.db.get(&keys::erc721_owner_key(token, token_id))?;
        Ok(Address::from_slice(&bytes))
    }

    /// Log positions emitted within `[from_height, to_height]`, in
    /// ascending block order (the filter index's natural key order —
    /// the API layer reverses it where the default descending contract
    /// applies, spec §4.3).
    pub fn log_positions_by_block_range(
        &self,
        from_height: u64,
        to_height: u64,
    ) -> IndexResult<Vec<LogPosition>> {
        let (start, end) = keys::log_by_block_range(from_height, to_height);
        Ok(self.db.scan(&start, &end)?.into_iter().map(|(k, _)| parse_block_tx_log(&k[1..])).collect())
    }

    pub fn log_positions_by_address(
        &self,
        address: Address,
        from_height: u64,
        to_height: u64,
    ) -> IndexResult<Vec<LogPosition>> {
        let (start, end) = keys::log_by_address_range(address, from_height, to_height);
        Ok(self
            .db
            .scan(&start, &end)?
            .into_iter()
            .map(|(k, _)| parse_block_tx_log(&k[21..]))
            .collect())
    }

    pub fn log_positions_by_topic(
        &self,
        topic_position: u8,
        topic: B256,
        from_height: u64,
        to_height: u64,
    ) -> IndexResult<Vec<LogPosition>> {
        let (start, end) = keys::log_by_topic_range(topic_position, topic, from_height, to_height);
        Ok(self
            .db
            .scan(&start, &end)?
            .into_iter()
            .map(|(k, _)| parse_block_tx_log(&k[34..]))
            .collect())
    }
}

/// Applies `(limit, offset)` to an already block-descending-ordered
/// (or otherwise index-native-ordered) row sequence and decodes each
/// surviving value (spec §4.3). `has_next_page` is true iff the
/// underlying scan produced strictly more than `offset + limit` rows.
fn paginate<T>(
    rows: Vec<(Vec<u8>, Vec<u8>)>,
    page: PageParams,
    decode_value: impl Fn(Vec<u8>, Vec<u8>) -> IndexResult<T>,
) -> IndexResult<Page<T>> {
    let limit = page.capped_limit() as usize;
    let offset = page.offset as usize;

    let has_next_page = rows.len() > offset + limit;
    let items = rows
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|(k, v)| decode_value(k, v))
        .collect::<IndexResult<Vec<_>>>()?;

    Ok(Page { items, has_next_page })
}

/// Smallest key strictly greater than every key sharing `prefix`,
/// giving an exclusive upper bound for a prefix scan over a
/// `Database::scan`'s inclusive range.
fn upper_bound(prefix: &[u8]) -> Vec<u8> {
    let mut bound = prefix.to_vec();
    for i in (0..bound.len()).rev() {
        if bound[i] != 0xff {
            bound[i] += 1;
            bound.truncate(i + 1);
            return bound;
        }
    }
    vec![0xff; prefix.len() + 1]
}

fn parse_block_tx_log(tail: &[u8]) -> LogPosition {
    LogPosition {
        block_height: u64::from_be_bytes(tail[0..8].try_into().unwrap()),
        tx_index: u32::from_be_bytes(tail[8..12].try_into().unwrap()),
        log_index: u32::from_be_bytes(tail[12..16].try_into().unwrap()),
    }
}
