use thiserror::Error;

/// Observable error kinds shared across the indexer core (spec §7).
///
/// Every crate below the API boundary maps its own errors into this
/// taxonomy at the point where it returns to a caller outside the crate,
/// so that the fetcher and the binary can apply one retry/log policy
/// regardless of which component produced the error.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// A point lookup found no value. Never returned from range scans,
    /// which yield an empty sequence instead.
    #[error("not found")]
    NotFound,

    /// The underlying store detected corrupted data.
    #[error("storage corruption: {0}")]
    Corruption(String),

    /// An I/O failure from the embedded store.
    #[error("storage i/o error: {0}")]
    Io(String),

    /// The store handle has been closed.
    #[error("storage handle closed")]
    Closed,

    /// A header's Extra field could not be decoded as `WBFTExtraRLP`.
    #[error("malformed wbft extra: {0}")]
    MalformedExtra(String),

    /// A log that looked like an ERC-20/721 Transfer was truncated or
    /// otherwise malformed; indexing for that single log is skipped.
    #[error("malformed transfer log: {0}")]
    MalformedTransferLog(String),

    /// RLP decoding of a block, transaction, receipt, or log failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// A request-scoped cancellation token fired.
    #[error("cancelled")]
    Cancelled,

    /// An upstream RPC call failed. Distinguishes rate-limiting from
    /// other transient failures so the fetcher and optimizer can react
    /// differently (spec §4.6, §6).
    #[error("rpc error (rate_limited={rate_limited}): {message}")]
    Rpc {
        /// Whether the caller-supplied predicate classified this as a
        /// rate-limit response (HTTP 429 semantics).
        rate_limited: bool,
        /// Human-readable detail from the transport.
        message: String,
    },

    /// A caller-supplied parameter failed validation at the API
    /// boundary (spec §6, §9). Kept here because the core's pagination
    /// and range-query contracts raise it directly.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

/// Convenience alias used throughout the core crates.
pub type IndexerResult<T> = Result<T, IndexerError>;

impl IndexerError {
    /// True for errors the fetcher should retry with backoff rather
    /// than bubble up immediately (spec §7 propagation policy).
    pub fn is_transient(&self) -> bool {
        matches!(self, IndexerError::Rpc { .. })
    }

    /// True when this RPC error was classified as rate-limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, IndexerError::Rpc { rate_limited: true, .. })
    }
}
