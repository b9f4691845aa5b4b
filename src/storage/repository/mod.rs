// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the casting database.
//!
//! Each repository provides CRUD operations for a specific entity type and
//! opens its own transaction per call.

pub mod actors;
pub mod movies;
pub mod shows;

pub use actors::ActorRepository;
pub use movies::MovieRepository;
pub use shows::ShowRepository;
