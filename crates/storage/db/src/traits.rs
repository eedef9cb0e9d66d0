use crate::error::DbResult;

/// A single mutation in a write batch (spec §4.1).
#[derive(Debug, Clone)]
pub enum WriteOp {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// An ordered byte-key → byte-value store (spec §4.1): point `get`,
/// range `scan`, and atomic batch `write`. Implementations must provide
/// durability: on successful `write`, a crash before return leaves
/// either all-none or all-committed of that batch. Reads are a snapshot
/// at call time; compaction is opaque and may run concurrently.
///
/// Mirrors `reth-db`'s `Database` trait split, but collapsed to the one
/// operation surface this core actually needs — a single flat,
/// namespace-prefixed keyspace rather than per-table typed columns.
pub trait Database: Send + Sync + 'static {
    /// Point lookup. Returns `Ok(None)` is never produced — absence is
    /// `Err(DbError::NotFound)` per spec §4.1; callers map that to
    /// `Option` at the call site if they want boolean presence
    /// semantics (see `has_block`/`has_key`).
    fn get(&self, key: &[u8]) -> DbResult<Vec<u8>>;

    /// Cheap existence probe; must not allocate or decode a value.
    fn has_key(&self, key: &[u8]) -> DbResult<bool>;

    /// Inclusive range scan in key order. Returns an empty vector, never
    /// an error, when nothing matches `start..=end`.
    fn scan(&self, start: &[u8], end: &[u8]) -> DbResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Applies every operation in `ops` atomically: all-or-nothing, and
    /// durable once this call returns `Ok`.
    fn write(&self, ops: Vec<WriteOp>) -> DbResult<()>;
}

/// Thin batch builder used by callers composing a block's atomic write
/// across storage/provider, storage/index, and consensus/wbft (spec
/// §3.3, §4.2: "writes, in one atomic batch").
#[derive(Debug, Default)]
pub struct Batch {
    ops: Vec<WriteOp>,
}

impl Batch {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(WriteOp::Put(key, value));
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.ops.push(WriteOp::Delete(key));
    }

    pub fn extend(&mut self, other: Batch) {
        self.ops.extend(other.ops);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn commit<D: Database + ?Sized>(self, db: &D) -> DbResult<()> {
        db.write(self.ops)
    }
}
