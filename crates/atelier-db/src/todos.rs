//! Todo repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use atelier_core::{CreateTodoRequest, Error, Result, Todo, TodoPatch, TodoRepository};

const TODO_COLUMNS: &str = "id, title, description, priority, completed, kind, created_at, updated_at";

/// SQLite implementation of TodoRepository.
pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    /// Create a new SqliteTodoRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> Result<Todo> {
        let sql = format!("SELECT {} FROM todo WHERE id = ?", TODO_COLUMNS);
        sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("Todo {} not found", id)))
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>> {
        let sql = format!("SELECT {} FROM todo ORDER BY created_at DESC", TODO_COLUMNS);
        sqlx::query_as::<_, Todo>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn insert(&self, req: CreateTodoRequest) -> Result<Todo> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO todo (title, description, priority, completed, kind, created_at, updated_at) \
             VALUES (?, ?, ?, 0, ?, ?, ?)",
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.priority)
        .bind(req.kind)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        let id = result.last_insert_rowid();
        debug!("Created todo {}", id);
        self.fetch(id).await
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Todo> {
        self.fetch(id).await?;

        let mut sets: Vec<&str> = vec!["updated_at = ?"];
        if patch.title.is_some() {
            sets.push("title = ?");
        }
        if patch.description.is_some() {
            sets.push("description = ?");
        }
        if patch.priority.is_some() {
            sets.push("priority = ?");
        }
        if patch.completed.is_some() {
            sets.push("completed = ?");
        }
        if patch.kind.is_some() {
            sets.push("kind = ?");
        }

        let sql = format!("UPDATE todo SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql).bind(Utc::now());
        if let Some(title) = patch.title {
            query = query.bind(title);
        }
        if let Some(description) = patch.description {
            query = query.bind(description);
        }
        if let Some(priority) = patch.priority {
            query = query.bind(priority);
        }
        if let Some(completed) = patch.completed {
            query = query.bind(completed);
        }
        if let Some(kind) = patch.kind {
            query = query.bind(kind);
        }

        query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        self.fetch(id).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Todo {} not found", id)));
        }
        debug!("Deleted todo {}", id);
        Ok(())
    }
}
