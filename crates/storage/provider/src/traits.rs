use alloy_primitives::B256;
use indexer_db::Batch;
use indexer_primitives::{Block, Receipt, Transaction, TxLocation};

use crate::error::ProviderResult;

/// Read half of the canonical block/receipt store (spec §4.2,
/// component B).
pub trait BlockReader {
    fn get_latest_height(&self) -> ProviderResult<u64>;
    fn get_block(&self, height: u64) -> ProviderResult<Block>;
    fn get_block_by_hash(&self, hash: B256) -> ProviderResult<Block>;
    fn get_transaction(&self, hash: B256) -> ProviderResult<(Transaction, TxLocation)>;
    fn get_receipt(&self, tx_hash: B256) -> ProviderResult<Receipt>;
    fn get_receipts_by_block(&self, height: u64) -> ProviderResult<Vec<Receipt>>;
    /// Point check against the canonical block key only; must not
    /// allocate the block body.
    fn has_block(&self, height: u64) -> ProviderResult<bool>;
}

/// Write half of the canonical block/receipt store. `put_block_with_receipts`
/// accepts the block's full transaction bodies alongside the receipts —
/// the spec's `Block` type carries only transaction *hashes* (§3.1), so
/// the bodies must be threaded through separately for this call to be
/// self-contained (see `DESIGN.md` open-question resolution).
pub trait BlockWriter {
    /// Writes, in one atomic batch: the block body, per-tx rows,
    /// per-tx location rows, per-tx receipt rows, all log rows, and
    /// `META/latest_height := max(current, block.height)`. Derived
    /// indices (component C) and consensus facts (component D) are
    /// layered into the *same* batch by callers that need them — see
    /// `begin_block_batch`.
    fn put_block_with_receipts(
        &self,
        block: &Block,
        transactions: &[Transaction],
        receipts: &[Receipt],
    ) -> ProviderResult<()>;

    /// Builds the batch for `put_block_with_receipts` without
    /// committing it, so `indexer-index` and `indexer-wbft` can append
    /// their own writes before a single atomic commit (spec §4.3: "same
    /// atomic batch as B's block write").
    fn block_batch(
        &self,
        block: &Block,
        transactions: &[Transaction],
        receipts: &[Receipt],
    ) -> ProviderResult<Batch>;

    /// Commits a batch built via [`BlockWriter::block_batch`] (optionally
    /// extended by other components) and advances `META/latest_height`.
    fn commit_block_batch(&self, height: u64, batch: Batch) -> ProviderResult<()>;

    /// Removes every artifact [`BlockWriter::put_block_with_receipts`]
    /// wrote for `height` (spec §7: required for a future reorg
    /// component to roll back consistently).
    fn delete_block(&self, height: u64) -> ProviderResult<()>;
}
