// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{with_auth, Permission},
    error::{self, ErrorEnvelope},
    models::{
        Actor, ActorResponse, ActorsResponse, CreateActorRequest, CreateMovieRequest,
        CreateShowRequest, DeletedResponse, Movie, MovieResponse, MoviesResponse, Show,
        ShowResponse, ShowsResponse, UpdateActorRequest, UpdateMovieRequest, WelcomeResponse,
    },
    state::AppState,
};

pub mod actors;
pub mod health;
pub mod movies;
pub mod shows;

pub fn router(state: AppState) -> Router {
    let auth = Arc::clone(&state.authorizer);

    let api_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route(
            "/actor",
            with_auth(&auth, Permission::GetActor, get(actors::list_actors))
                .merge(with_auth(&auth, Permission::PostActor, post(actors::create_actor))),
        )
        .route(
            "/actor/{actor_id}",
            with_auth(&auth, Permission::PatchActor, patch(actors::update_actor))
                .merge(with_auth(&auth, Permission::DeleteActor, delete(actors::delete_actor))),
        )
        .route(
            "/movie",
            with_auth(&auth, Permission::GetMovie, get(movies::list_movies))
                .merge(with_auth(&auth, Permission::PostMovie, post(movies::create_movie))),
        )
        .route(
            "/movie/{movie_id}",
            with_auth(&auth, Permission::PatchMovie, patch(movies::update_movie))
                .merge(with_auth(&auth, Permission::DeleteMovie, delete(movies::delete_movie))),
        )
        .route("/show", get(shows::list_shows).post(shows::create_show))
        .method_not_allowed_fallback(error::method_not_allowed)
        .with_state(state);

    // Layers run outermost-last: the request id is set before tracing sees it.
    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(error::not_found)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, body = WelcomeResponse))
)]
pub async fn index() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        success: true,
        message: "Welcome to the Casting Agency API".to_string(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        index,
        health::health,
        health::liveness,
        health::readiness,
        actors::list_actors,
        actors::create_actor,
        actors::update_actor,
        actors::delete_actor,
        movies::list_movies,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        shows::list_shows,
        shows::create_show
    ),
    components(
        schemas(
            Actor,
            Movie,
            Show,
            CreateActorRequest,
            UpdateActorRequest,
            CreateMovieRequest,
            UpdateMovieRequest,
            CreateShowRequest,
            ActorsResponse,
            ActorResponse,
            MoviesResponse,
            MovieResponse,
            ShowsResponse,
            ShowResponse,
            DeletedResponse,
            WelcomeResponse,
            ErrorEnvelope
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Actors", description = "Actor management"),
        (name = "Movies", description = "Movie management"),
        (name = "Shows", description = "Casting actors into movies")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
