//! `libmdbx`-backed [`Database`] implementation. One unnamed MDBX table
//! holds the entire namespace-prefixed keyspace (spec §3.2) — range
//! scans across a namespace are plain MDBX cursor walks bounded by the
//! prefix's min/max key, since byte-lexical order already matches our
//! encoding.

use std::path::Path;

use libmdbx::{Environment, EnvironmentKind, Geometry, WriteFlags, RW};
use parking_lot::Mutex;

use crate::error::{DbError, DbResult};
use crate::traits::{Database, WriteOp};

/// Default MDBX map size. Generous up front since MDBX grows the
/// backing file lazily; resized by `set_geometry` if a deployment needs
/// more.
const DEFAULT_MAP_SIZE: usize = 1 << 40; // 1 TiB address-space reservation

/// A `libmdbx` environment opened against a single on-disk directory.
/// `libmdbx` transactions aren't `Send` across its own internal lock, so
/// write transactions are additionally serialized behind a `Mutex` —
/// matching MDBX's single-writer model rather than fighting it.
pub struct MdbxDatabase<E: EnvironmentKind = libmdbx::NoWriteMap> {
    env: Environment<E>,
    write_lock: Mutex<()>,
}

impl MdbxDatabase<libmdbx::NoWriteMap> {
    /// Opens (creating if absent) an MDBX environment at `path` with a
    /// single unnamed table.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        std::fs::create_dir_all(path.as_ref()).map_err(|e| DbError::Io(e.to_string()))?;

        let env = Environment::new()
            .set_geometry(Geometry {
                size: Some(0..DEFAULT_MAP_SIZE),
                ..Default::default()
            })
            .set_max_dbs(1)
            .open(path.as_ref())
            .map_err(|e| DbError::Io(e.to_string()))?;

        // Ensure the unnamed table exists before any reader opens it.
        {
            let tx = env.begin_rw_txn().map_err(DbError::from)?;
            tx.create_db(None, Default::default()).map_err(DbError::from)?;
            tx.commit().map_err(DbError::from)?;
        }

        Ok(Self { env, write_lock: Mutex::new(()) })
    }
}

impl<E: EnvironmentKind> Database for MdbxDatabase<E> {
    fn get(&self, key: &[u8]) -> DbResult<Vec<u8>> {
        let tx = self.env.begin_ro_txn().map_err(DbError::from)?;
        let db = tx.open_db(None).map_err(DbError::from)?;
        let value: Option<Vec<u8>> = tx.get(&db, key).map_err(DbError::from)?;
        value.ok_or(DbError::NotFound)
    }

    fn has_key(&self, key: &[u8]) -> DbResult<bool> {
        let tx = self.env.begin_ro_txn().map_err(DbError::from)?;
        let db = tx.open_db(None).map_err(DbError::from)?;
        let value: Option<Vec<u8>> = tx.get(&db, key).map_err(DbError::from)?;
        Ok(value.is_some())
    }

    fn scan(&self, start: &[u8], end: &[u8]) -> DbResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let tx = self.env.begin_ro_txn().map_err(DbError::from)?;
        let db = tx.open_db(None).map_err(DbError::from)?;
        let mut cursor = tx.cursor(&db).map_err(DbError::from)?;

        let mut out = Vec::new();
        let mut entry = cursor.set_range(start).map_err(DbError::from)?;
        while let Some((key, value)) = entry {
            if key.as_slice() > end {
                break;
            }
            out.push((key, value));
            entry = cursor.next().map_err(DbError::from)?;
        }
        Ok(out)
    }

    fn write(&self, ops: Vec<WriteOp>) -> DbResult<()> {
        let _guard = self.write_lock.lock();
        let tx: libmdbx::Transaction<'_, RW, E> =
            self.env.begin_rw_txn().map_err(DbError::from)?;
        let db = tx.open_db(None).map_err(DbError::from)?;

        for op in ops {
            match op {
                WriteOp::Put(key, value) => {
                    tx.put(&db, key, value, WriteFlags::UPSERT).map_err(DbError::from)?;
                }
                WriteOp::Delete(key) => match tx.del(&db, key, None) {
                    Ok(_) | Err(libmdbx::Error::NotFound) => {}
                    Err(e) => return Err(DbError::from(e)),
                },
            }
        }

        tx.commit().map_err(DbError::from)?;
        Ok(())
    }
}

impl<E: EnvironmentKind> std::fmt::Debug for MdbxDatabase<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MdbxDatabase").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Batch;

    fn open_tmp() -> (tempfile::TempDir, MdbxDatabase) {
        let dir = tempfile::tempdir().unwrap();
        let db = MdbxDatabase::open(dir.path()).unwrap();
        (dir, db)
    }

    #[test]
    fn point_get_returns_not_found_for_absent_key() {
        let (_dir, db) = open_tmp();
        assert!(matches!(db.get(b"missing"), Err(DbError::NotFound)));
    }

    #[test]
    fn batch_write_is_atomic_and_visible_after_commit() {
        let (_dir, db) = open_tmp();
        let mut batch = Batch::new();
        batch.put(b"a".to_vec(), b"1".to_vec());
        batch.put(b"b".to_vec(), b"2".to_vec());
        batch.commit(&db).unwrap();

        assert_eq!(db.get(b"a").unwrap(), b"1");
        assert_eq!(db.get(b"b").unwrap(), b"2");
    }

    #[test]
    fn scan_returns_empty_sequence_not_error_when_nothing_matches() {
        let (_dir, db) = open_tmp();
        let rows = db.scan(b"x", b"z").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn scan_is_ordered_and_bounded_inclusive() {
        let (_dir, db) = open_tmp();
        let mut batch = Batch::new();
        for k in [b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"d".to_vec()] {
            batch.put(k.clone(), k);
        }
        batch.commit(&db).unwrap();

        let rows = db.scan(b"b", b"c").unwrap();
        let keys: Vec<_> = rows.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn delete_removes_key() {
        let (_dir, db) = open_tmp();
        let mut batch = Batch::new();
        batch.put(b"a".to_vec(), b"1".to_vec());
        batch.commit(&db).unwrap();

        let mut del = Batch::new();
        del.delete(b"a".to_vec());
        del.commit(&db).unwrap();

        assert!(matches!(db.get(b"a"), Err(DbError::NotFound)));
    }
}
