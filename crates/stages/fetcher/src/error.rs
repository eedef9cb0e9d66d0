use thiserror::Error;

use indexer_primitives::IndexerError;

/// Errors the fetcher surfaces to its caller. Everything else — the
/// per-block retry loop, rate-limit classification — is handled
/// internally per the propagation policy (spec §7).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Rpc(#[from] indexer_rpc_client::RpcError),

    #[error(transparent)]
    Provider(#[from] indexer_provider::ProviderError),

    #[error(transparent)]
    Index(#[from] indexer_index::IndexError),

    #[error(transparent)]
    Wbft(#[from] indexer_wbft::WbftError),

    #[error("exhausted {0} retries fetching block {1}")]
    RetriesExhausted(u32, u64),
}

pub type FetchResult<T> = Result<T, FetchError>;

impl From<FetchError> for IndexerError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Cancelled => IndexerError::Cancelled,
            FetchError::Rpc(e) => e.into(),
            FetchError::Provider(e) => e.into(),
            FetchError::Index(e) => e.into(),
            FetchError::Wbft(e) => e.into(),
            FetchError::RetriesExhausted(n, h) => {
                IndexerError::Io(format!("exhausted {n} retries fetching block {h}"))
            }
        }
    }
}
