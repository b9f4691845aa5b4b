// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Actor repository.
//!
//! Actors are stored as JSON under their numeric id in the `actors` table.

use redb::ReadableTable;

use crate::models::{Actor, CreateActorRequest, UpdateActorRequest};

use super::super::database::{
    next_id, read_all, read_record, write_record, CastingDatabase, StorageError, StorageResult,
    ACTORS, SHOWS,
};

/// Repository for actor operations.
pub struct ActorRepository<'a> {
    db: &'a CastingDatabase,
}

impl<'a> ActorRepository<'a> {
    pub fn new(db: &'a CastingDatabase) -> Self {
        Self { db }
    }

    /// All actors, ordered by id.
    pub fn list(&self) -> StorageResult<Vec<Actor>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACTORS)?;
        read_all(&table)
    }

    pub fn create(&self, request: &CreateActorRequest) -> StorageResult<Actor> {
        let write_txn = self.db.begin_write()?;
        let actor = {
            let actor = Actor::from_request(next_id(&write_txn, "actors")?, request);
            let mut table = write_txn.open_table(ACTORS)?;
            write_record(&mut table, actor.id, &actor)?;
            actor
        };
        write_txn.commit()?;
        Ok(actor)
    }

    /// Apply a partial update and return the stored result.
    pub fn update(&self, actor_id: u64, patch: &UpdateActorRequest) -> StorageResult<Actor> {
        let write_txn = self.db.begin_write()?;
        let actor = {
            let mut table = write_txn.open_table(ACTORS)?;
            let mut actor: Actor =
                read_record(&table, actor_id)?.ok_or_else(|| not_found(actor_id))?;
            actor.apply(patch);
            write_record(&mut table, actor_id, &actor)?;
            actor
        };
        write_txn.commit()?;
        Ok(actor)
    }

    /// Delete an actor that is not cast in any show.
    pub fn delete(&self, actor_id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let shows = write_txn.open_table(SHOWS)?;
            if shows
                .range((actor_id, 0)..=(actor_id, u64::MAX))?
                .next()
                .transpose()?
                .is_some()
            {
                return Err(StorageError::Constraint(format!(
                    "actor {actor_id} is cast in a show"
                )));
            }

            let mut table = write_txn.open_table(ACTORS)?;
            if table.remove(actor_id)?.is_none() {
                return Err(not_found(actor_id));
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

fn not_found(actor_id: u64) -> StorageError {
    StorageError::NotFound(format!("actor {actor_id}"))
}
