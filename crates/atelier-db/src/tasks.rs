//! Project task repository implementation.
//!
//! Every task mutation and the resulting project progress recompute run in
//! a single transaction, so progress is never observable out of step with
//! the task set.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};
use tracing::debug;

use atelier_core::{
    progress_percent, CreateTaskRequest, Error, ProjectTask, Result, TaskPatch, TaskRepository,
    TaskStatus,
};

const TASK_COLUMNS: &str = "id, title, description, status, priority, assignee, \
     start_date, due_date, project_id, created_at, updated_at";

/// SQLite implementation of TaskRepository.
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    /// Create a new SqliteTaskRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn project_exists_tx(tx: &mut Transaction<'_, Sqlite>, project_id: i64) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM project WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?;
        Ok(row.is_some())
    }

    async fn fetch_tx(tx: &mut Transaction<'_, Sqlite>, task_id: i64) -> Result<ProjectTask> {
        let sql = format!("SELECT {} FROM project_task WHERE id = ?", TASK_COLUMNS);
        sqlx::query_as::<_, ProjectTask>(&sql)
            .bind(task_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("Task {} not found", task_id)))
    }

    /// Recompute and persist a project's progress from its current task set.
    ///
    /// Runs on the caller's transaction so the task mutation and the derived
    /// progress commit together. The project's updated_at is refreshed too.
    async fn recompute_progress_tx(
        tx: &mut Transaction<'_, Sqlite>,
        project_id: i64,
    ) -> Result<()> {
        let (total, done): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
             COALESCE(SUM(CASE WHEN status = 'done' THEN 1 ELSE 0 END), 0) \
             FROM project_task WHERE project_id = ?",
        )
        .bind(project_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

        let progress = progress_percent(done, total);
        sqlx::query("UPDATE project SET progress = ?, updated_at = ? WHERE id = ?")
            .bind(progress)
            .bind(Utc::now())
            .bind(project_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        debug!(
            "Recomputed progress for project {}: {}% ({}/{} done)",
            project_id, progress, done, total
        );
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn list(&self, project_id: i64, status: Option<TaskStatus>) -> Result<Vec<ProjectTask>> {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM project WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        if exists.is_none() {
            return Err(Error::NotFound(format!("Project {} not found", project_id)));
        }

        let mut sql = format!(
            "SELECT {} FROM project_task WHERE project_id = ? ",
            TASK_COLUMNS
        );
        if status.is_some() {
            sql.push_str("AND status = ? ");
        }
        sql.push_str("ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, ProjectTask>(&sql).bind(project_id);
        if let Some(status) = status {
            query = query.bind(status);
        }

        query.fetch_all(&self.pool).await.map_err(Error::Database)
    }

    async fn insert(&self, project_id: i64, req: CreateTaskRequest) -> Result<ProjectTask> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        if !Self::project_exists_tx(&mut tx, project_id).await? {
            return Err(Error::NotFound(format!("Project {} not found", project_id)));
        }

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO project_task (title, description, status, priority, assignee, \
             start_date, due_date, project_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.status)
        .bind(req.priority)
        .bind(&req.assignee)
        .bind(req.start_date)
        .bind(req.due_date)
        .bind(project_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let id = result.last_insert_rowid();
        Self::recompute_progress_tx(&mut tx, project_id).await?;
        let task = Self::fetch_tx(&mut tx, id).await?;

        tx.commit().await.map_err(Error::Database)?;
        debug!("Created task {} under project {}", id, project_id);
        Ok(task)
    }

    async fn update(&self, task_id: i64, patch: TaskPatch) -> Result<ProjectTask> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let existing = Self::fetch_tx(&mut tx, task_id).await?;

        let mut sets: Vec<&str> = vec!["updated_at = ?"];
        if patch.title.is_some() {
            sets.push("title = ?");
        }
        if patch.description.is_some() {
            sets.push("description = ?");
        }
        if patch.status.is_some() {
            sets.push("status = ?");
        }
        if patch.priority.is_some() {
            sets.push("priority = ?");
        }
        if patch.assignee.is_some() {
            sets.push("assignee = ?");
        }
        if patch.start_date.is_some() {
            sets.push("start_date = ?");
        }
        if patch.due_date.is_some() {
            sets.push("due_date = ?");
        }

        let sql = format!("UPDATE project_task SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql).bind(Utc::now());
        if let Some(title) = patch.title {
            query = query.bind(title);
        }
        if let Some(description) = patch.description {
            query = query.bind(description);
        }
        if let Some(status) = patch.status {
            query = query.bind(status);
        }
        if let Some(priority) = patch.priority {
            query = query.bind(priority);
        }
        if let Some(assignee) = patch.assignee {
            query = query.bind(assignee);
        }
        if let Some(start_date) = patch.start_date {
            query = query.bind(start_date);
        }
        if let Some(due_date) = patch.due_date {
            query = query.bind(due_date);
        }

        query
            .bind(task_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        Self::recompute_progress_tx(&mut tx, existing.project_id).await?;
        let task = Self::fetch_tx(&mut tx, task_id).await?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(task)
    }

    async fn delete(&self, task_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let existing = Self::fetch_tx(&mut tx, task_id).await?;

        sqlx::query("DELETE FROM project_task WHERE id = ?")
            .bind(task_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        Self::recompute_progress_tx(&mut tx, existing.project_id).await?;

        tx.commit().await.map_err(Error::Database)?;
        debug!("Deleted task {}", task_id);
        Ok(())
    }
}
