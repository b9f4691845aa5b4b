// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Show API endpoints.
//!
//! Shows are public: listing and casting need no token.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{ApiError, ErrorEnvelope, ValidatedJson},
    models::{CreateShowRequest, ShowResponse, ShowsResponse},
    state::AppState,
    storage::ShowRepository,
};

#[utoipa::path(
    get,
    path = "/show",
    tag = "Shows",
    responses((status = 200, description = "All shows, possibly none", body = ShowsResponse))
)]
pub async fn list_shows(State(state): State<AppState>) -> Result<Json<ShowsResponse>, ApiError> {
    let shows = ShowRepository::new(&state.db).list()?;
    Ok(Json(ShowsResponse {
        success: true,
        shows,
    }))
}

#[utoipa::path(
    post,
    path = "/show",
    tag = "Shows",
    request_body = CreateShowRequest,
    responses(
        (status = 201, description = "Show created", body = ShowResponse),
        (status = 422, description = "Unknown actor or movie, or show already exists", body = ErrorEnvelope)
    )
)]
pub async fn create_show(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateShowRequest>,
) -> Result<(StatusCode, Json<ShowResponse>), ApiError> {
    let show = ShowRepository::new(&state.db).create(&request)?;
    tracing::info!(actor_id = show.actor_id, movie_id = show.movie_id, "show created");
    Ok((
        StatusCode::CREATED,
        Json(ShowResponse {
            success: true,
            show,
        }),
    ))
}
