//! Core data models for atelier.
//!
//! These types are shared across all atelier crates and represent the
//! domain entities. Serde renames follow the wire contract, which mixes
//! camelCase timestamps (`createdAt`) with snake_case date fields
//! (`start_date`) for historical compatibility.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default tag assigned to notes created without one.
pub const DEFAULT_NOTE_TAG: &str = "默认";

/// Sentinel tag always listed first by the tag index ("All").
pub const ALL_NOTES_TAG: &str = "全部";

// =============================================================================
// ENUMS
// =============================================================================

/// Priority level shared by todos, projects, and project tasks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Lifecycle status of a project.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Completed,
    Onhold,
}

/// Status of a single project task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Inprogress,
    Done,
}

/// Kind of todo entry. Pomodoro entries differ only by this field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TodoKind {
    #[default]
    Todo,
    Pomodoro,
}

// =============================================================================
// ENTITIES
// =============================================================================

/// A named grouping container for notes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Folder {
    pub id: i64,
    pub name: String,
}

/// A note, optionally filed in a folder and linkable to projects.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tag: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "folderId")]
    pub folder_id: Option<i64>,
}

/// A todo or pomodoro entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    #[serde(rename = "type")]
    pub kind: TodoKind,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A project together with its derived task counts.
///
/// `task_count` and `completed_tasks` are computed per-query and are part
/// of every project representation returned over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub progress: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "taskCount")]
    pub task_count: i64,
    #[serde(rename = "completedTasks")]
    pub completed_tasks: i64,
}

/// A task belonging to a project.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectTask {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub assignee: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "projectId")]
    pub project_id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A many-to-many association record between a project and a note.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectNoteLink {
    pub id: i64,
    #[serde(rename = "projectId")]
    pub project_id: i64,
    #[serde(rename = "noteId")]
    pub note_id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// STATS
// =============================================================================

/// Compact view of a recently updated project for the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecentProject {
    pub id: i64,
    pub name: String,
    pub status: ProjectStatus,
    pub progress: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Aggregate counts across all projects and tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(rename = "totalProjects")]
    pub total_projects: i64,
    #[serde(rename = "activeProjects")]
    pub active_projects: i64,
    #[serde(rename = "completedProjects")]
    pub completed_projects: i64,
    #[serde(rename = "totalTasks")]
    pub total_tasks: i64,
    #[serde(rename = "completedTasks")]
    pub completed_tasks: i64,
    #[serde(rename = "recentProjects")]
    pub recent_projects: Vec<RecentProject>,
}

// =============================================================================
// PROGRESS
// =============================================================================

/// Compute a project's completion percentage from its task counts.
///
/// `floor(100 * done / total)`, or 0 when the project has no tasks.
pub fn progress_percent(done_tasks: i64, total_tasks: i64) -> i64 {
    if total_tasks <= 0 {
        return 0;
    }
    (100 * done_tasks) / total_tasks
}
