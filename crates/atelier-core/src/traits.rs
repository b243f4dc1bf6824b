//! Repository traits and request/patch types for atelier.
//!
//! These traits define the interfaces the database layer implements,
//! keeping handlers decoupled from SQL and enabling test doubles.
//!
//! # Patch semantics
//!
//! Updates are expressed as explicit patch objects where every field is an
//! optional override: an omitted key keeps the current value. For nullable
//! columns the field is a double `Option` — `None` means "key absent, keep",
//! `Some(None)` means "explicit null, clear". This is the one consistent
//! partial-update policy used across all entities.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::models::*;

/// Deserialize a field into `Some(value)` so that serde's `default` can
/// distinguish an absent key (`None`) from an explicit `null`
/// (`Some(None)`). Used with `#[serde(default, deserialize_with = "..")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn default_note_tag() -> String {
    DEFAULT_NOTE_TAG.to_string()
}

// =============================================================================
// NOTES
// =============================================================================

/// Filter for listing notes.
#[derive(Debug, Clone, Default)]
pub struct ListNotesFilter {
    /// Exact folder match.
    pub folder_id: Option<i64>,
    /// Case-sensitive substring matched against title, content, and tag.
    pub search: Option<String>,
}

/// Request for creating a new note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_note_tag")]
    pub tag: String,
    #[serde(default, rename = "folderId")]
    pub folder_id: Option<i64>,
}

/// Partial update for a note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tag: Option<String>,
    #[serde(default, rename = "folderId", deserialize_with = "double_option")]
    pub folder_id: Option<Option<i64>>,
}

/// Repository for folder reads.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// List all folders.
    async fn list(&self) -> Result<Vec<Folder>>;
}

/// Repository for note CRUD, search, and the tag index.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List notes matching the filter, most recently updated first.
    async fn list(&self, filter: ListNotesFilter) -> Result<Vec<Note>>;

    /// Insert a new note and return it.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Apply a patch to a note. Fails with NotFound if the id is absent.
    async fn update(&self, id: i64, patch: NotePatch) -> Result<Note>;

    /// Delete a note. Project links referencing it are removed by cascade.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Distinct non-empty tags across all notes, with the sentinel "全部"
    /// forced to the first position exactly once.
    async fn list_tags(&self) -> Result<Vec<String>>;
}

// =============================================================================
// TODOS
// =============================================================================

/// Request for creating a todo or pomodoro entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, rename = "type")]
    pub kind: TodoKind,
}

/// Partial update for a todo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<TodoKind>,
}

/// Repository for todo CRUD.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// List all todos, most recently created first.
    async fn list(&self) -> Result<Vec<Todo>>;

    /// Insert a new todo and return it.
    async fn insert(&self, req: CreateTodoRequest) -> Result<Todo>;

    /// Apply a patch to a todo. Fails with NotFound if the id is absent.
    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Todo>;

    /// Delete a todo. Fails with NotFound if the id is absent.
    async fn delete(&self, id: i64) -> Result<()>;
}

// =============================================================================
// PROJECTS
// =============================================================================

/// Filter for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ListProjectsFilter {
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
}

/// Request for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress: i64,
}

/// Partial update for a project.
///
/// `progress` changes only when explicitly passed here; otherwise it is
/// derived solely from task mutations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    pub progress: Option<i64>,
}

/// Repository for project CRUD and aggregate stats.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// List projects matching the filter, most recently updated first,
    /// with derived task counts.
    async fn list(&self, filter: ListProjectsFilter) -> Result<Vec<Project>>;

    /// Fetch one project with derived task counts.
    async fn fetch(&self, id: i64) -> Result<Project>;

    /// Insert a new project and return it (task counts are zero).
    async fn insert(&self, req: CreateProjectRequest) -> Result<Project>;

    /// Apply a patch to a project. Fails with NotFound if the id is absent.
    async fn update(&self, id: i64, patch: ProjectPatch) -> Result<Project>;

    /// Delete a project, cascading to its tasks and note links.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Aggregate counts plus the five most recently updated projects.
    async fn stats(&self) -> Result<ProjectStats>;
}

// =============================================================================
// PROJECT TASKS
// =============================================================================

/// Request for creating a project task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Partial update for a project task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Repository for project tasks.
///
/// Every mutation recomputes the owning project's progress inside the same
/// transaction, so a reader never observes a task change without the
/// corresponding progress update.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List a project's tasks, most recently created first, optionally
    /// filtered by status. Fails with NotFound if the project is absent.
    async fn list(&self, project_id: i64, status: Option<TaskStatus>) -> Result<Vec<ProjectTask>>;

    /// Create a task under a project. Fails with NotFound if the project
    /// is absent.
    async fn insert(&self, project_id: i64, req: CreateTaskRequest) -> Result<ProjectTask>;

    /// Apply a patch to a task. Fails with NotFound if the id is absent.
    async fn update(&self, task_id: i64, patch: TaskPatch) -> Result<ProjectTask>;

    /// Delete a task. Fails with NotFound if the id is absent.
    async fn delete(&self, task_id: i64) -> Result<()>;
}

// =============================================================================
// PROJECT-NOTE LINKS
// =============================================================================

/// Repository for the project-note association.
#[async_trait]
pub trait ProjectNoteRepository: Send + Sync {
    /// All notes linked to a project, most recently updated first.
    /// Fails with NotFound if the project is absent.
    async fn list_notes(&self, project_id: i64) -> Result<Vec<Note>>;

    /// Link a note to a project. Fails with NotFound if either side is
    /// absent, and with Conflict if the pair is already linked.
    async fn link(&self, project_id: i64, note_id: i64) -> Result<ProjectNoteLink>;

    /// Remove a link. Fails with NotFound if no such link exists.
    async fn unlink(&self, project_id: i64, note_id: i64) -> Result<()>;
}

// =============================================================================
// SERIALIZED RESPONSES
// =============================================================================

/// Message body returned by configuration writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
