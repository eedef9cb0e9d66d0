//! Upstream JSON-RPC client contract (spec §6), consumed by the
//! fetcher pipeline's `fetch_block_job`.

use indexer_primitives::{Block, Receipt, Transaction};

use crate::error::RpcResult;

/// What the fetcher needs from an upstream node. Errors surface as
/// opaque [`crate::error::RpcError`] values; the fetcher distinguishes
/// only rate-limiting (`RpcError::is_rate_limited`) from everything
/// else (spec §6).
#[async_trait::async_trait]
pub trait RpcClient: Send + Sync {
    async fn get_latest_block_number(&self) -> RpcResult<u64>;

    /// Returns the block's header/hash data plus its full transaction
    /// bodies — the spec's `Block` type carries only transaction
    /// hashes, so callers split the two out before persisting via
    /// `indexer-provider`.
    async fn get_block_by_number(&self, height: u64) -> RpcResult<(Block, Vec<Transaction>)>;

    async fn get_block_receipts(&self, height: u64) -> RpcResult<Vec<Receipt>>;

    /// Releases any held transport resources. Idempotent.
    async fn close(&self) -> RpcResult<()>;
}
