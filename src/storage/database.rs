// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded casting database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `actors`: actor id → serialized Actor
//! - `movies`: movie id → serialized Movie
//! - `shows`: (actor id, movie id) → ()
//! - `sequences`: table name → last issued id

use std::path::Path;

use redb::{
    backends::InMemoryBackend, Database, ReadTransaction, ReadableDatabase, ReadableTable,
    Table, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

pub(crate) const ACTORS: TableDefinition<u64, &[u8]> = TableDefinition::new("actors");

pub(crate) const MOVIES: TableDefinition<u64, &[u8]> = TableDefinition::new("movies");

/// Composite key `(actor_id, movie_id)`, so one actor's shows form a contiguous range.
pub(crate) const SHOWS: TableDefinition<(u64, u64), ()> = TableDefinition::new("shows");

const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    /// A write would break a reference between records.
    #[error("{0}")]
    Constraint(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// CastingDatabase
// =============================================================================

pub struct CastingDatabase {
    db: Database,
}

impl CastingDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::init(Database::create(path)?)
    }

    /// Database that lives only as long as this value.
    pub fn in_memory() -> StorageResult<Self> {
        Self::init(Database::builder().create_with_backend(InMemoryBackend::new())?)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACTORS)?;
            let _ = write_txn.open_table(MOVIES)?;
            let _ = write_txn.open_table(SHOWS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }

    pub(crate) fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    pub(crate) fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Round-trip a read transaction, for health checks.
    pub fn ping(&self) -> StorageResult<()> {
        let read_txn = self.begin_read()?;
        let _ = read_txn.open_table(SEQUENCES)?;
        Ok(())
    }
}

// =============================================================================
// Record Helpers
// =============================================================================

/// Issue the next id for `sequence`. Ids start at 1 and are never reused.
pub(crate) fn next_id(txn: &WriteTransaction, sequence: &str) -> StorageResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|last| last.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

pub(crate) fn read_record<T, R>(table: &R, id: u64) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<u64, &'static [u8]>,
{
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

/// All records in ascending id order.
pub(crate) fn read_all<T, R>(table: &R) -> StorageResult<Vec<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<u64, &'static [u8]>,
{
    let mut records = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        records.push(serde_json::from_slice(value.value())?);
    }
    Ok(records)
}

pub(crate) fn write_record<T: Serialize>(
    table: &mut Table<'_, u64, &'static [u8]>,
    id: u64,
    record: &T,
) -> StorageResult<()> {
    let json = serde_json::to_vec(record)?;
    table.insert(id, json.as_slice())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_file_and_tables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("casting.redb");

        let db = CastingDatabase::open(&path).unwrap();
        assert!(path.exists());
        db.ping().unwrap();
    }

    #[test]
    fn ids_are_sequential_per_sequence() {
        let db = CastingDatabase::in_memory().unwrap();
        let txn = db.begin_write().unwrap();
        assert_eq!(next_id(&txn, "actors").unwrap(), 1);
        assert_eq!(next_id(&txn, "actors").unwrap(), 2);
        assert_eq!(next_id(&txn, "movies").unwrap(), 1);
        txn.commit().unwrap();

        let txn = db.begin_write().unwrap();
        assert_eq!(next_id(&txn, "actors").unwrap(), 3);
    }

    #[test]
    fn ids_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("casting.redb");
        {
            let db = CastingDatabase::open(&path).unwrap();
            let txn = db.begin_write().unwrap();
            next_id(&txn, "actors").unwrap();
            txn.commit().unwrap();
        }

        let db = CastingDatabase::open(&path).unwrap();
        let txn = db.begin_write().unwrap();
        assert_eq!(next_id(&txn, "actors").unwrap(), 2);
    }
}
