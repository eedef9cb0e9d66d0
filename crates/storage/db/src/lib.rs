//! KV engine adapter (spec §4.1, component A). Presents an ordered
//! byte-key → byte-value store with point `get`, range `scan`, and
//! atomic batch `write`, backed by `libmdbx`.

pub mod error;
pub mod keys;
pub mod mdbx;
pub mod traits;

pub use error::{DbError, DbResult};
pub use keys::Namespace;
pub use mdbx::MdbxDatabase;
pub use traits::{Batch, Database, WriteOp};
