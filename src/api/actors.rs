// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Actor API endpoints.
//!
//! Every operation is gated by its own `verb:actor` permission; see
//! [`router`](super::router) for the wiring.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Claims,
    error::{ApiError, ApiPath, ErrorEnvelope, ValidatedJson},
    models::{ActorResponse, ActorsResponse, CreateActorRequest, DeletedResponse, UpdateActorRequest},
    state::AppState,
    storage::ActorRepository,
};

/// List all actors.
#[utoipa::path(
    get,
    path = "/actor",
    tag = "Actors",
    security(("bearer_auth" = ["get:actor"])),
    responses(
        (status = 200, description = "All actors, possibly none", body = ActorsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Permission not granted", body = ErrorEnvelope)
    )
)]
pub async fn list_actors(
    Claims(_caller): Claims,
    State(state): State<AppState>,
) -> Result<Json<ActorsResponse>, ApiError> {
    let actors = ActorRepository::new(&state.db).list()?;
    Ok(Json(ActorsResponse {
        success: true,
        actors,
    }))
}

#[utoipa::path(
    post,
    path = "/actor",
    tag = "Actors",
    security(("bearer_auth" = ["post:actor"])),
    request_body = CreateActorRequest,
    responses(
        (status = 201, description = "Actor created", body = ActorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Permission not granted", body = ErrorEnvelope),
        (status = 422, description = "Invalid actor", body = ErrorEnvelope)
    )
)]
pub async fn create_actor(
    Claims(caller): Claims,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateActorRequest>,
) -> Result<(StatusCode, Json<ActorResponse>), ApiError> {
    let actor = ActorRepository::new(&state.db).create(&request)?;
    tracing::info!(actor_id = actor.id, subject = %caller.subject(), "actor created");
    Ok((
        StatusCode::CREATED,
        Json(ActorResponse {
            success: true,
            actor,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/actor/{actor_id}",
    tag = "Actors",
    security(("bearer_auth" = ["patch:actor"])),
    params(
        ("actor_id" = u64, Path, description = "Identifier of the actor to update")
    ),
    request_body = UpdateActorRequest,
    responses(
        (status = 200, description = "Actor updated", body = ActorResponse),
        (status = 400, description = "Actor id is not an unsigned integer", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Permission not granted", body = ErrorEnvelope),
        (status = 404, description = "Actor not found", body = ErrorEnvelope),
        (status = 422, description = "Invalid update", body = ErrorEnvelope)
    )
)]
pub async fn update_actor(
    Claims(caller): Claims,
    ApiPath(actor_id): ApiPath<u64>,
    State(state): State<AppState>,
    ValidatedJson(patch): ValidatedJson<UpdateActorRequest>,
) -> Result<Json<ActorResponse>, ApiError> {
    let actor = ActorRepository::new(&state.db).update(actor_id, &patch)?;
    tracing::info!(actor_id, subject = %caller.subject(), "actor updated");
    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

#[utoipa::path(
    delete,
    path = "/actor/{actor_id}",
    tag = "Actors",
    security(("bearer_auth" = ["delete:actor"])),
    params(
        ("actor_id" = u64, Path, description = "Identifier of the actor to delete")
    ),
    responses(
        (status = 200, description = "Actor deleted", body = DeletedResponse),
        (status = 400, description = "Actor id is not an unsigned integer", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Permission not granted", body = ErrorEnvelope),
        (status = 404, description = "Actor not found", body = ErrorEnvelope),
        (status = 422, description = "Actor is cast in a show", body = ErrorEnvelope)
    )
)]
pub async fn delete_actor(
    Claims(caller): Claims,
    ApiPath(actor_id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    ActorRepository::new(&state.db).delete(actor_id)?;
    tracing::info!(actor_id, subject = %caller.subject(), "actor deleted");
    Ok(Json(DeletedResponse {
        success: true,
        deleted: actor_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{authorizer, caller};
    use crate::storage::CastingDatabase;

    fn state() -> AppState {
        AppState::new(CastingDatabase::in_memory().unwrap(), authorizer())
    }

    fn meryl() -> CreateActorRequest {
        CreateActorRequest {
            name: "Meryl Streep".into(),
            age: 70,
            gender: "female".into(),
        }
    }

    #[tokio::test]
    async fn create_actor_success() {
        let state = state();

        let (status, Json(response)) = create_actor(
            caller(&["post:actor"]),
            State(state.clone()),
            ValidatedJson(meryl()),
        )
        .await
        .expect("actor creation succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert!(response.success);
        assert_eq!(response.actor.name, "Meryl Streep");

        let stored = ActorRepository::new(&state.db).list().unwrap();
        assert_eq!(stored, vec![response.actor]);
    }

    #[tokio::test]
    async fn list_actors_empty_is_ok() {
        let Json(response) = list_actors(caller(&["get:actor"]), State(state()))
            .await
            .expect("listing succeeds");
        assert!(response.success);
        assert!(response.actors.is_empty());
    }

    #[tokio::test]
    async fn update_actor_success() {
        let state = state();
        let actor = ActorRepository::new(&state.db).create(&meryl()).unwrap();

        let Json(response) = update_actor(
            caller(&["patch:actor"]),
            ApiPath(actor.id),
            State(state.clone()),
            ValidatedJson(UpdateActorRequest {
                name: Some("Meryl Louise Streep".into()),
                ..Default::default()
            }),
        )
        .await
        .expect("update succeeds");

        assert_eq!(response.actor.name, "Meryl Louise Streep");
        assert_eq!(response.actor.age, 70);
    }

    #[tokio::test]
    async fn update_missing_actor_is_not_found() {
        let err = update_actor(
            caller(&["patch:actor"]),
            ApiPath(7),
            State(state()),
            ValidatedJson(UpdateActorRequest::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_actor_success() {
        let state = state();
        let actor = ActorRepository::new(&state.db).create(&meryl()).unwrap();

        let Json(response) =
            delete_actor(caller(&["delete:actor"]), ApiPath(actor.id), State(state.clone()))
                .await
                .expect("deletion succeeds");

        assert_eq!(response.deleted, actor.id);
        assert!(ActorRepository::new(&state.db).list().unwrap().is_empty());
    }
}
