// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage in a single embedded redb database file.
//!
//! ## Integrity
//!
//! - Every write runs in one ACID write transaction
//! - Shows may only reference existing actors and movies
//! - Actors and movies referenced by a show cannot be deleted
//! - Ids are issued from per-table sequences and never reused

pub mod database;
pub mod repository;

pub use database::{CastingDatabase, StorageError, StorageResult};
pub use repository::{ActorRepository, MovieRepository, ShowRepository};
