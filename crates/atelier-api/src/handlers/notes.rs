//! Folder, note, and tag HTTP handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use atelier_core::{
    CreateNoteRequest, Folder, FolderRepository, ListNotesFilter, Note, NotePatch, NoteRepository,
};

use crate::{ApiError, AppState};

/// Query parameters for listing notes.
#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    /// Exact folder filter.
    #[serde(rename = "folderId")]
    pub folder_id: Option<i64>,
    /// Substring searched across title, content, and tag.
    pub search: Option<String>,
}

/// List all folders.
pub async fn list_folders(State(state): State<AppState>) -> Result<Json<Vec<Folder>>, ApiError> {
    Ok(Json(state.db.folders.list().await?))
}

/// List notes, optionally filtered by folder and search string,
/// most recently updated first.
pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let filter = ListNotesFilter {
        folder_id: query.folder_id,
        search: query.search.filter(|s| !s.is_empty()),
    };
    Ok(Json(state.db.notes.list(filter).await?))
}

/// Create a note.
///
/// # Returns
/// - 201 Created with the full note
pub async fn create_note(
    State(state): State<AppState>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = state.db.notes.insert(req).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Apply a partial update to a note.
///
/// Omitted fields keep their current value; an explicit `"folderId": null`
/// clears the folder reference.
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<NotePatch>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.db.notes.update(id, patch).await?))
}

/// Delete a note and its project links.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.notes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Distinct note tags, with "全部" always first.
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.db.notes.list_tags().await?))
}
