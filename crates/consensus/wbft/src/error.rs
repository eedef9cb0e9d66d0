use thiserror::Error;
use indexer_db::DbError;

#[derive(Debug, Error)]
pub enum WbftError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Db(DbError),
    #[error("rlp decode error: {0}")]
    Decode(String),
    /// Extra field shorter than the 32-byte vanity prefix, or the
    /// remainder failed to decode as `WbftExtraRlp` (spec §4.4).
    #[error("malformed wbft extra: {0}")]
    MalformedExtra(String),
}

pub type WbftResult<T> = Result<T, WbftError>;

impl From<DbError> for WbftError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => WbftError::NotFound,
            other => WbftError::Db(other),
        }
    }
}

impl From<WbftError> for indexer_primitives::IndexerError {
    fn from(e: WbftError) -> Self {
        use indexer_primitives::IndexerError as E;
        match e {
            WbftError::NotFound => E::NotFound,
            WbftError::Db(db) => db.into(),
            WbftError::Decode(s) => E::Decode(s),
            WbftError::MalformedExtra(s) => E::MalformedExtra(s),
        }
    }
}
