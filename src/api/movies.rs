// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Movie API endpoints, gated by `verb:movie` permissions.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Claims,
    error::{ApiError, ApiPath, ErrorEnvelope, ValidatedJson},
    models::{CreateMovieRequest, DeletedResponse, MovieResponse, MoviesResponse, UpdateMovieRequest},
    state::AppState,
    storage::MovieRepository,
};

#[utoipa::path(
    get,
    path = "/movie",
    tag = "Movies",
    security(("bearer_auth" = ["get:movie"])),
    responses(
        (status = 200, description = "All movies, possibly none", body = MoviesResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Permission not granted", body = ErrorEnvelope)
    )
)]
pub async fn list_movies(
    Claims(_caller): Claims,
    State(state): State<AppState>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let movies = MovieRepository::new(&state.db).list()?;
    Ok(Json(MoviesResponse {
        success: true,
        movies,
    }))
}

#[utoipa::path(
    post,
    path = "/movie",
    tag = "Movies",
    security(("bearer_auth" = ["post:movie"])),
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = MovieResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Permission not granted", body = ErrorEnvelope),
        (status = 422, description = "Invalid movie", body = ErrorEnvelope)
    )
)]
pub async fn create_movie(
    Claims(caller): Claims,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateMovieRequest>,
) -> Result<(StatusCode, Json<MovieResponse>), ApiError> {
    let movie = MovieRepository::new(&state.db).create(&request)?;
    tracing::info!(movie_id = movie.id, subject = %caller.subject(), "movie created");
    Ok((
        StatusCode::CREATED,
        Json(MovieResponse {
            success: true,
            movie,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/movie/{movie_id}",
    tag = "Movies",
    security(("bearer_auth" = ["patch:movie"])),
    params(
        ("movie_id" = u64, Path, description = "Identifier of the movie to update")
    ),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = MovieResponse),
        (status = 400, description = "Movie id is not an unsigned integer", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Permission not granted", body = ErrorEnvelope),
        (status = 404, description = "Movie not found", body = ErrorEnvelope),
        (status = 422, description = "Invalid update", body = ErrorEnvelope)
    )
)]
pub async fn update_movie(
    Claims(caller): Claims,
    ApiPath(movie_id): ApiPath<u64>,
    State(state): State<AppState>,
    ValidatedJson(patch): ValidatedJson<UpdateMovieRequest>,
) -> Result<Json<MovieResponse>, ApiError> {
    let movie = MovieRepository::new(&state.db).update(movie_id, &patch)?;
    tracing::info!(movie_id, subject = %caller.subject(), "movie updated");
    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

#[utoipa::path(
    delete,
    path = "/movie/{movie_id}",
    tag = "Movies",
    security(("bearer_auth" = ["delete:movie"])),
    params(
        ("movie_id" = u64, Path, description = "Identifier of the movie to delete")
    ),
    responses(
        (status = 200, description = "Movie deleted", body = DeletedResponse),
        (status = 400, description = "Movie id is not an unsigned integer", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Permission not granted", body = ErrorEnvelope),
        (status = 404, description = "Movie not found", body = ErrorEnvelope),
        (status = 422, description = "Movie has cast members", body = ErrorEnvelope)
    )
)]
pub async fn delete_movie(
    Claims(caller): Claims,
    ApiPath(movie_id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    MovieRepository::new(&state.db).delete(movie_id)?;
    tracing::info!(movie_id, subject = %caller.subject(), "movie deleted");
    Ok(Json(DeletedResponse {
        success: true,
        deleted: movie_id,
    }))
}
