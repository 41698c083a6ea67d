//! Notes API endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::note::{Note, NoteFields, NoteId};
use crate::repository::NotesRepository;
use crate::server::auth::authenticate;
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

/// Response for delete operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteNoteResponse {
    pub ok: bool,
}

fn note_fields(
    payload: Result<Json<NoteFields>, JsonRejection>,
) -> Result<NoteFields, ApiError> {
    let Json(fields) =
        payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    fields.validate()?;
    Ok(fields)
}

async fn repository_for(
    state: &ServerState,
    headers: &HeaderMap,
) -> Result<NotesRepository, ApiError> {
    let owner = authenticate(state, headers).await?;
    Ok(NotesRepository::new(state.store.clone(), owner))
}

#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "notes",
    responses(
        (status = 200, description = "Notes of the caller, newest first", body = [Note]),
        (status = 401, body = ApiErrorResponse),
        (status = 502, body = ApiErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn list(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Note>>, ApiError> {
    let repository = repository_for(&state, &headers).await?;
    Ok(Json(repository.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "notes",
    request_body = NoteFields,
    responses(
        (status = 200, body = Note),
        (status = 400, body = ApiErrorResponse),
        (status = 401, body = ApiErrorResponse),
        (status = 502, body = ApiErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn create(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    payload: Result<Json<NoteFields>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let repository = repository_for(&state, &headers).await?;
    let payload = note_fields(payload)?;
    let note = repository.create(&payload.title, &payload.content).await?;
    Ok(Json(note))
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    tag = "notes",
    params(("id" = String, Path, description = "Note id")),
    request_body = NoteFields,
    responses(
        (status = 200, body = Note),
        (status = 400, body = ApiErrorResponse),
        (status = 401, body = ApiErrorResponse),
        (status = 502, description = "No note matched or the store failed",
            body = ApiErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn update(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<NoteFields>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let repository = repository_for(&state, &headers).await?;
    let payload = note_fields(payload)?;
    let note = repository
        .update(&NoteId::new(id), &payload.title, &payload.content)
        .await?;
    Ok(Json(note))
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    tag = "notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Deleted, or nothing matched", body = DeleteNoteResponse),
        (status = 401, body = ApiErrorResponse),
        (status = 502, body = ApiErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn delete(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeleteNoteResponse>, ApiError> {
    let repository = repository_for(&state, &headers).await?;
    repository.delete(&NoteId::new(id)).await?;
    Ok(Json(DeleteNoteResponse { ok: true }))
}
