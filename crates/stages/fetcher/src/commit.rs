//! Builds one atomic batch across components B, C, and D and commits
//! it, advancing `META/latest_height` as the final write (spec §4.5).

use indexer_db::Database;
use indexer_index::IndexBuilder;
use indexer_provider::{BlockWriter, Provider};
use indexer_wbft::WbftBuilder;

use crate::error::FetchResult;
use crate::job::FetchedBlock;

pub(crate) fn commit_fetched_block<DB: Database>(
    provider: &Provider<DB>,
    index_builder: &IndexBuilder,
    wbft_builder: &WbftBuilder<DB>,
    fetched: &FetchedBlock,
) -> FetchResult<()> {
    let mut batch = provider.block_batch(&fetched.block, &fetched.transactions, &fetched.receipts)?;
    index_builder.index_block(&mut batch, &fetched.block, &fetched.transactions, &fetched.receipts)?;
    wbft_builder.index_block(&mut batch, &fetched.block.header)?;
    provider.commit_block_batch(fetched.height, batch)?;
    Ok(())
}
