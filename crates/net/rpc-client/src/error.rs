use thiserror::Error;

/// Errors surfaced by an [`crate::client::RpcClient`] implementation
/// (spec §6). The fetcher distinguishes only rate-limiting from
/// everything else; `Decode` and `Transport` are both "other" for
/// retry purposes but kept distinct for logging.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("malformed rpc response: {0}")]
    Decode(String),
    #[error("rpc call cancelled")]
    Cancelled,
}

pub type RpcResult<T> = Result<T, RpcError>;

impl RpcError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RpcError::RateLimited(_))
    }
}

impl From<RpcError> for indexer_primitives::IndexerError {
    fn from(e: RpcError) -> Self {
        use indexer_primitives::IndexerError as E;
        match &e {
            RpcError::Cancelled => E::Cancelled,
            RpcError::RateLimited(msg) => E::Rpc { rate_limited: true, message: msg.clone() },
            RpcError::Transport(msg) | RpcError::Decode(msg) => {
                E::Rpc { rate_limited: false, message: msg.clone() }
            }
        }
    }
}
