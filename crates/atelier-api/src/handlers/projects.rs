//! Project, project task, and project-note link HTTP handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use atelier_core::{
    CreateProjectRequest, CreateTaskRequest, ListProjectsFilter, Note, Priority, Project,
    ProjectNoteLink, ProjectNoteRepository, ProjectPatch, ProjectRepository, ProjectStats,
    ProjectStatus, ProjectTask, TaskPatch, TaskRepository, TaskStatus,
};

use crate::{ApiError, AppState};

/// Query parameters for listing projects.
#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
}

/// Query parameters for listing project tasks.
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<TaskStatus>,
}

/// Request body for linking a note to a project.
#[derive(Debug, Deserialize)]
pub struct LinkNoteRequest {
    #[serde(rename = "noteId")]
    pub note_id: Option<i64>,
}

// -----------------------------------------------------------------------------
// Projects
// -----------------------------------------------------------------------------

/// List projects, optionally filtered by status and priority, most
/// recently updated first. Every project carries derived task counts.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let filter = ListProjectsFilter {
        status: query.status,
        priority: query.priority,
    };
    Ok(Json(state.db.projects.list(filter).await?))
}

/// Create a project.
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.db.projects.insert(req).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Apply a partial update to a project.
///
/// `progress` only changes when passed explicitly; it is otherwise derived
/// from task mutations.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.db.projects.update(id, patch).await?))
}

/// Delete a project, cascading to its tasks and note links.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.projects.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Aggregate project/task counts and the five most recently updated
/// projects.
pub async fn project_stats(
    State(state): State<AppState>,
) -> Result<Json<ProjectStats>, ApiError> {
    Ok(Json(state.db.projects.stats().await?))
}

// -----------------------------------------------------------------------------
// Project tasks
// -----------------------------------------------------------------------------

/// List a project's tasks, optionally filtered by status.
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<ProjectTask>>, ApiError> {
    Ok(Json(state.db.tasks.list(project_id, query.status).await?))
}

/// Create a task under a project. The project's progress is recomputed in
/// the same transaction.
pub async fn create_project_task(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ProjectTask>), ApiError> {
    let task = state.db.tasks.insert(project_id, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Apply a partial update to a task, recomputing the owning project's
/// progress.
pub async fn update_project_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<ProjectTask>, ApiError> {
    Ok(Json(state.db.tasks.update(task_id, patch).await?))
}

/// Delete a task, recomputing the owning project's progress.
pub async fn delete_project_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.tasks.delete(task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -----------------------------------------------------------------------------
// Project-note links
// -----------------------------------------------------------------------------

/// List all notes linked to a project, most recently updated first.
pub async fn list_project_notes(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.db.project_notes.list_notes(project_id).await?))
}

/// Link a note to a project.
///
/// # Returns
/// - 201 Created with the link record
/// - 400 if `noteId` is missing
/// - 404 if the project or note is absent
/// - 409 if the pair is already linked
pub async fn link_note_to_project(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Json(req): Json<LinkNoteRequest>,
) -> Result<(StatusCode, Json<ProjectNoteLink>), ApiError> {
    let note_id = req
        .note_id
        .ok_or_else(|| ApiError::BadRequest("noteId is required".to_string()))?;
    let link = state.db.project_notes.link(project_id, note_id).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// Remove a project-note link (the note itself is untouched).
pub async fn unlink_note_from_project(
    State(state): State<AppState>,
    Path((project_id, note_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.db.project_notes.unlink(project_id, note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
