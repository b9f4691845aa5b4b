// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Movie repository.

use redb::ReadableTable;

use crate::models::{CreateMovieRequest, Movie, UpdateMovieRequest};

use super::super::database::{
    next_id, read_all, read_record, write_record, CastingDatabase, StorageError, StorageResult,
    MOVIES, SHOWS,
};

/// Repository for movie operations.
pub struct MovieRepository<'a> {
    db: &'a CastingDatabase,
}

impl<'a> MovieRepository<'a> {
    pub fn new(db: &'a CastingDatabase) -> Self {
        Self { db }
    }

    /// All movies, ordered by id.
    pub fn list(&self) -> StorageResult<Vec<Movie>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MOVIES)?;
        read_all(&table)
    }

    pub fn create(&self, request: &CreateMovieRequest) -> StorageResult<Movie> {
        let write_txn = self.db.begin_write()?;
        let movie = {
            let movie = Movie::from_request(next_id(&write_txn, "movies")?, request);
            let mut table = write_txn.open_table(MOVIES)?;
            write_record(&mut table, movie.id, &movie)?;
            movie
        };
        write_txn.commit()?;
        Ok(movie)
    }

    /// Apply a partial update and return the stored result.
    pub fn update(&self, movie_id: u64, patch: &UpdateMovieRequest) -> StorageResult<Movie> {
        let write_txn = self.db.begin_write()?;
        let movie = {
            let mut table = write_txn.open_table(MOVIES)?;
            let mut movie: Movie =
                read_record(&table, movie_id)?.ok_or_else(|| not_found(movie_id))?;
            movie.apply(patch);
            write_record(&mut table, movie_id, &movie)?;
            movie
        };
        write_txn.commit()?;
        Ok(movie)
    }

    /// Delete a movie that has no cast.
    pub fn delete(&self, movie_id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            // Shows are keyed actor-first, so a movie's cast needs a scan.
            let shows = write_txn.open_table(SHOWS)?;
            for entry in shows.iter()? {
                let (key, _) = entry?;
                if key.value().1 == movie_id {
                    return Err(StorageError::Constraint(format!(
                        "movie {movie_id} has cast members"
                    )));
                }
            }

            let mut table = write_txn.open_table(MOVIES)?;
            if table.remove(movie_id)?.is_none() {
                return Err(not_found(movie_id));
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

fn not_found(movie_id: u64) -> StorageError {
    StorageError::NotFound(format!("movie {movie_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateActorRequest, CreateShowRequest};
    use crate::storage::repository::{ActorRepository, ShowRepository};
    use chrono::NaiveDate;

    fn joker() -> CreateMovieRequest {
        CreateMovieRequest {
            title: "Joker".into(),
            release_date: NaiveDate::from_ymd_opt(2019, 10, 4),
        }
    }

    #[test]
    fn create_and_list() {
        let db = CastingDatabase::in_memory().unwrap();
        let repo = MovieRepository::new(&db);

        let movie = repo.create(&joker()).unwrap();
        assert_eq!(movie.id, 1);
        assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(2019, 10, 4));
        assert_eq!(repo.list().unwrap(), vec![movie]);
    }

    #[test]
    fn movie_and_actor_ids_are_independent() {
        let db = CastingDatabase::in_memory().unwrap();
        ActorRepository::new(&db)
            .create(&CreateActorRequest {
                name: "Joaquin Phoenix".into(),
                age: 45,
                gender: "male".into(),
            })
            .unwrap();

        assert_eq!(MovieRepository::new(&db).create(&joker()).unwrap().id, 1);
    }

    #[test]
    fn update_sets_title() {
        let db = CastingDatabase::in_memory().unwrap();
        let repo = MovieRepository::new(&db);
        let movie = repo.create(&joker()).unwrap();

        let updated = repo
            .update(
                movie.id,
                &UpdateMovieRequest {
                    title: Some("Joker: Folie à Deux".into()),
                    release_date: None,
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Joker: Folie à Deux");
        assert_eq!(updated.release_date, movie.release_date);
    }

    #[test]
    fn update_unknown_movie_is_not_found() {
        let db = CastingDatabase::in_memory().unwrap();
        let result = MovieRepository::new(&db).update(
            42,
            &UpdateMovieRequest {
                title: None,
                release_date: None,
            },
        );
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn delete_refuses_movie_with_cast() {
        let db = CastingDatabase::in_memory().unwrap();
        let repo = MovieRepository::new(&db);
        let movie = repo.create(&joker()).unwrap();
        let actor = ActorRepository::new(&db)
            .create(&CreateActorRequest {
                name: "Joaquin Phoenix".into(),
                age: 45,
                gender: "male".into(),
            })
            .unwrap();
        ShowRepository::new(&db)
            .create(&CreateShowRequest {
                actor_id: actor.id,
                movie_id: movie.id,
            })
            .unwrap();

        assert!(matches!(
            repo.delete(movie.id),
            Err(StorageError::Constraint(_))
        ));
    }

    #[test]
    fn delete_removes_uncast_movie() {
        let db = CastingDatabase::in_memory().unwrap();
        let repo = MovieRepository::new(&db);
        let movie = repo.create(&joker()).unwrap();

        repo.delete(movie.id).unwrap();
        assert!(repo.list().unwrap().is_empty());
    }
}
