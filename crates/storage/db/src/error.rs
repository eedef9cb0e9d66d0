use thiserror::Error;

/// Error kinds exposed by the KV engine adapter (spec §4.1). `NotFound`
/// is returned only from point `get`; `scan` returns an empty sequence
/// instead of an error when nothing matches.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("key not found")]
    NotFound,

    #[error("storage corruption: {0}")]
    Corruption(String),

    #[error("storage i/o error: {0}")]
    Io(String),

    #[error("database handle closed")]
    Closed,
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for indexer_primitives::IndexerError {
    fn from(e: DbError) -> Self {
        use indexer_primitives::IndexerError as E;
        match e {
            DbError::NotFound => E::NotFound,
            DbError::Corruption(s) => E::Corruption(s),
            DbError::Io(s) => E::Io(s),
            DbError::Closed => E::Closed,
        }
    }
}

impl From<libmdbx::Error> for DbError {
    fn from(e: libmdbx::Error) -> Self {
        match e {
            libmdbx::Error::NotFound | libmdbx::Error::NoData => DbError::NotFound,
            libmdbx::Error::Corrupted | libmdbx::Error::PageCorrupted => {
                DbError::Corruption(e.to_string())
            }
            other => DbError::Io(other.to_string()),
        }
    }
}
