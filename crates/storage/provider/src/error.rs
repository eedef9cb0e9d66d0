use thiserror::Error;
use indexer_db::DbError;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Db(DbError),
    #[error("rlp decode error: {0}")]
    Decode(String),
    #[error("inconsistent write: {0}")]
    Inconsistent(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl From<ProviderError> for indexer_primitives::IndexerError {
    fn from(e: ProviderError) -> Self {
        use indexer_primitives::IndexerError as E;
        match e {
            ProviderError::NotFound => E::NotFound,
            ProviderError::Db(DbError::NotFound) => E::NotFound,
            ProviderError::Db(db) => db.into(),
            ProviderError::Decode(s) => E::Decode(s),
            ProviderError::Inconsistent(s) => E::Corruption(s),
        }
    }
}

impl From<DbError> for ProviderError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => ProviderError::NotFound,
            other => ProviderError::Db(other),
        }
    }
}
