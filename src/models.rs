// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Records, request bodies and response envelopes used by the REST API.
//! All types derive `ToSchema` for OpenAPI documentation; request bodies
//! also derive `Validate` and are read through
//! [`ValidatedJson`](crate::error::ValidatedJson).
//!
//! ## Model Categories
//!
//! - **Actors**: Performers available for casting
//! - **Movies**: Productions, with an optional release date
//! - **Shows**: Links between an actor and a movie

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Oldest age accepted for an actor.
pub const MAX_ACTOR_AGE: u32 = 150;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

// =============================================================================
// Actors
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateActorRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(range(max = MAX_ACTOR_AGE, message = "exceeds the maximum age"))]
    pub age: u32,
    #[validate(custom(function = "not_blank"))]
    pub gender: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateActorRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(range(max = MAX_ACTOR_AGE, message = "exceeds the maximum age"))]
    pub age: Option<u32>,
    #[validate(custom(function = "not_blank"))]
    pub gender: Option<String>,
}

impl Actor {
    pub(crate) fn from_request(id: u64, request: &CreateActorRequest) -> Self {
        Self {
            id,
            name: request.name.trim().to_string(),
            age: request.age,
            gender: request.gender.trim().to_string(),
        }
    }

    pub(crate) fn apply(&mut self, patch: &UpdateActorRequest) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(gender) = &patch.gender {
            self.gender = gender.trim().to_string();
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActorsResponse {
    pub success: bool,
    pub actors: Vec<Actor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActorResponse {
    pub success: bool,
    pub actor: Actor,
}

// =============================================================================
// Movies
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    /// ISO 8601 date, e.g. `2019-10-04`.
    pub release_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateMovieRequest {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateMovieRequest {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl Movie {
    pub(crate) fn from_request(id: u64, request: &CreateMovieRequest) -> Self {
        Self {
            id,
            title: request.title.trim().to_string(),
            release_date: request.release_date,
        }
    }

    pub(crate) fn apply(&mut self, patch: &UpdateMovieRequest) {
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(release_date) = patch.release_date {
            self.release_date = Some(release_date);
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MoviesResponse {
    pub success: bool,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: Movie,
}

// =============================================================================
// Shows
// =============================================================================

/// An actor cast in a movie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Show {
    pub actor_id: u64,
    pub movie_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateShowRequest {
    pub actor_id: u64,
    pub movie_id: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowsResponse {
    pub success: bool,
    pub shows: Vec<Show>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowResponse {
    pub success: bool,
    pub show: Show,
}

// =============================================================================
// Shared
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    /// Id of the removed record.
    pub deleted: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub success: bool,
    pub message: String,
}
