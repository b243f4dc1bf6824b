//! Todo HTTP handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use atelier_core::{CreateTodoRequest, Todo, TodoPatch, TodoRepository};

use crate::{ApiError, AppState};

/// List all todos, most recently created first.
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.db.todos.list().await?))
}

/// Create a todo (or pomodoro entry via `"type": "pomodoro"`).
pub async fn create_todo(
    State(state): State<AppState>,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.db.todos.insert(req).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Apply a partial update to a todo.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.db.todos.update(id, patch).await?))
}

/// Delete a todo.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.todos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
