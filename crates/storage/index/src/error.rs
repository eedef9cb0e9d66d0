use thiserror::Error;
use indexer_db::DbError;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Db(DbError),
    #[error("rlp decode error: {0}")]
    Decode(String),
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

pub type IndexResult<T> = Result<T, IndexError>;

impl From<DbError> for IndexError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => IndexError::NotFound,
            other => IndexError::Db(other),
        }
    }
}

impl From<IndexError> for indexer_primitives::IndexerError {
    fn from(e: IndexError) -> Self {
        use indexer_primitives::IndexerError as E;
        match e {
            IndexError::NotFound => E::NotFound,
            IndexError::Db(db) => db.into(),
            IndexError::Decode(s) => E::Decode(s),
            IndexError::InvalidParam(s) => E::InvalidParam(s),
        }
    }
}
