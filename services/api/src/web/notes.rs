//! services/api/src/web/notes.rs
//!
//! Contains the Axum handlers for the note endpoints, the action
//! orchestration that turns service results into redirect-or-error
//! outcomes, and the master definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect},
    Form,
};
use chrono::{DateTime, Utc};
use notes_core::domain::{ActionResult, Note};
use notes_core::service;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_notes_handler,
        get_note_handler,
        create_note_handler,
        update_note_handler,
        delete_note_handler,
    ),
    components(
        schemas(NoteResponse, NoteForm, ActionResultBody)
    ),
    tags(
        (name = "Notes API", description = "API endpoints for the note-taking service.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A note as exposed to callers (camelCase timestamps, ISO-8601).
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Form input for creating or updating a note.
#[derive(Deserialize, ToSchema)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// The serialized shape of an [`ActionResult`]: `{success, noteId | error}`.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionResultBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ActionResult> for ActionResultBody {
    fn from(result: ActionResult) -> Self {
        match result {
            ActionResult::Success { note_id } => Self {
                success: true,
                note_id: Some(note_id),
                error: None,
            },
            ActionResult::Failure { error } => Self {
                success: false,
                note_id: None,
                error: Some(error),
            },
        }
    }
}

fn failure_response(result: ActionResult) -> (StatusCode, Json<ActionResultBody>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ActionResultBody::from(result)),
    )
}

//=========================================================================================
// Read Handlers
//=========================================================================================

/// List all notes, most recent first.
#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes, most recent first", body = [NoteResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_notes_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NoteResponse>>, StatusCode> {
    let notes = state.repo.get_all_notes().await.map_err(|e| {
        error!(error = %e, "failed to list notes");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

/// Fetch a single note by id.
#[utoipa::path(
    get,
    path = "/notes/{id}",
    responses(
        (status = 200, description = "The note", body = NoteResponse),
        (status = 404, description = "No note with this id"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The note id")
    )
)]
pub async fn get_note_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<NoteResponse>, StatusCode> {
    let note = state.repo.get_note_by_id(id).await.map_err(|e| {
        error!(error = %e, note_id = %id, "failed to fetch note");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    match note {
        Some(note) => Ok(Json(NoteResponse::from(note))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// The note-creation surface. The form itself is rendered client-side; this
/// route exists so admission to it is decided by the session gate.
pub async fn new_note_handler() -> StatusCode {
    StatusCode::OK
}

/// The edit surface for a note: serves the current field values the edit
/// form is prefilled with. Admission is decided by the session gate.
pub async fn edit_note_handler(
    state: State<Arc<AppState>>,
    id: Path<Uuid>,
) -> Result<Json<NoteResponse>, StatusCode> {
    get_note_handler(state, id).await
}

//=========================================================================================
// Mutation Handlers (Action Orchestration)
//=========================================================================================

/// Create a note. On success, navigates to the collection view.
#[utoipa::path(
    post,
    path = "/notes",
    request_body(content = NoteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Note created; redirect to the collection view"),
        (status = 422, description = "Validation or storage failure", body = ActionResultBody)
    )
)]
pub async fn create_note_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect, (StatusCode, Json<ActionResultBody>)> {
    let result = service::create_note(state.repo.as_ref(), &form.title, &form.content).await;
    match result {
        ActionResult::Success { .. } => Ok(Redirect::to("/")),
        failure => Err(failure_response(failure)),
    }
}

/// Update a note. On success, navigates to the detail view of the note.
#[utoipa::path(
    post,
    path = "/notes/{id}",
    request_body(content = NoteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Note updated; redirect to the detail view"),
        (status = 422, description = "Validation or storage failure", body = ActionResultBody)
    ),
    params(
        ("id" = Uuid, Path, description = "The note id")
    )
)]
pub async fn update_note_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect, (StatusCode, Json<ActionResultBody>)> {
    let result = service::update_note(state.repo.as_ref(), id, &form.title, &form.content).await;
    match result {
        ActionResult::Success { note_id } => Ok(Redirect::to(&format!("/notes/{note_id}"))),
        failure => Err(failure_response(failure)),
    }
}

/// Delete a note. Deliberately asymmetric to create/update: no navigation
/// effect on success, the result is returned for the caller to react to.
#[utoipa::path(
    post,
    path = "/notes/{id}/delete",
    responses(
        (status = 200, description = "Note deleted", body = ActionResultBody),
        (status = 422, description = "Storage failure", body = ActionResultBody)
    ),
    params(
        ("id" = Uuid, Path, description = "The note id")
    )
)]
pub async fn delete_note_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let result = service::delete_note(state.repo.as_ref(), id).await;
    match result {
        success @ ActionResult::Success { .. } => {
            (StatusCode::OK, Json(ActionResultBody::from(success))).into_response()
        }
        failure => failure_response(failure).into_response(),
    }
}
