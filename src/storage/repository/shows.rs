// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Show repository.
//!
//! A show links one actor to one movie. Both must exist when the show is
//! created, and each pair is stored at most once.

use redb::ReadableTable;

use crate::models::{CreateShowRequest, Show};

use super::super::database::{CastingDatabase, StorageError, StorageResult, ACTORS, MOVIES, SHOWS};

/// Repository for show operations.
pub struct ShowRepository<'a> {
    db: &'a CastingDatabase,
}

impl<'a> ShowRepository<'a> {
    pub fn new(db: &'a CastingDatabase) -> Self {
        Self { db }
    }

    /// All shows, ordered by actor id then movie id.
    pub fn list(&self) -> StorageResult<Vec<Show>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SHOWS)?;

        let mut shows = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            let (actor_id, movie_id) = key.value();
            shows.push(Show { actor_id, movie_id });
        }
        Ok(shows)
    }

    pub fn create(&self, request: &CreateShowRequest) -> StorageResult<Show> {
        let show = Show {
            actor_id: request.actor_id,
            movie_id: request.movie_id,
        };

        let write_txn = self.db.begin_write()?;
        {
            let actors = write_txn.open_table(ACTORS)?;
            if actors.get(show.actor_id)?.is_none() {
                return Err(StorageError::Constraint(format!(
                    "actor {} does not exist",
                    show.actor_id
                )));
            }
            let movies = write_txn.open_table(MOVIES)?;
            if movies.get(show.movie_id)?.is_none() {
                return Err(StorageError::Constraint(format!(
                    "movie {} does not exist",
                    show.movie_id
                )));
            }

            let mut table = write_txn.open_table(SHOWS)?;
            if table.insert((show.actor_id, show.movie_id), ())?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "show for actor {} in movie {}",
                    show.actor_id, show.movie_id
                )));
            }
        }
        write_txn.commit()?;
        Ok(show)
    }
}
