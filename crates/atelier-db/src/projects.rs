//! Project repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use atelier_core::{
    CreateProjectRequest, Error, ListProjectsFilter, Project, ProjectPatch, ProjectRepository,
    ProjectStats, RecentProject, Result,
};

/// SELECT clause for a project annotated with its derived task counts.
const PROJECT_SELECT: &str = "SELECT p.id, p.name, p.description, p.status, p.priority, \
     p.start_date, p.end_date, p.progress, p.created_at, p.updated_at, \
     (SELECT COUNT(*) FROM project_task t WHERE t.project_id = p.id) AS task_count, \
     (SELECT COUNT(*) FROM project_task t WHERE t.project_id = p.id AND t.status = 'done') AS completed_tasks \
     FROM project p";

/// SQLite implementation of ProjectRepository.
pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    /// Create a new SqliteProjectRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn list(&self, filter: ListProjectsFilter) -> Result<Vec<Project>> {
        let mut sql = format!("{} WHERE 1=1 ", PROJECT_SELECT);
        if filter.status.is_some() {
            sql.push_str("AND p.status = ? ");
        }
        if filter.priority.is_some() {
            sql.push_str("AND p.priority = ? ");
        }
        sql.push_str("ORDER BY p.updated_at DESC");

        let mut query = sqlx::query_as::<_, Project>(&sql);
        if let Some(status) = filter.status {
            query = query.bind(status);
        }
        if let Some(priority) = filter.priority {
            query = query.bind(priority);
        }

        query.fetch_all(&self.pool).await.map_err(Error::Database)
    }

    async fn fetch(&self, id: i64) -> Result<Project> {
        let sql = format!("{} WHERE p.id = ?", PROJECT_SELECT);
        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("Project {} not found", id)))
    }

    async fn insert(&self, req: CreateProjectRequest) -> Result<Project> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO project (name, description, status, priority, start_date, end_date, \
             progress, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.status)
        .bind(req.priority)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.progress)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        let id = result.last_insert_rowid();
        debug!("Created project {}", id);
        self.fetch(id).await
    }

    async fn update(&self, id: i64, patch: ProjectPatch) -> Result<Project> {
        self.fetch(id).await?;

        let mut sets: Vec<&str> = vec!["updated_at = ?"];
        if patch.name.is_some() {
            sets.push("name = ?");
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
        if patch.start_date.is_some() {
            sets.push("start_date = ?");
        }
        if patch.end_date.is_some() {
            sets.push("end_date = ?");
        }
        if patch.progress.is_some() {
            sets.push("progress = ?");
        }

        let sql = format!("UPDATE project SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql).bind(Utc::now());
        if let Some(name) = patch.name {
            query = query.bind(name);
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
        if let Some(start_date) = patch.start_date {
            query = query.bind(start_date);
        }
        if let Some(end_date) = patch.end_date {
            query = query.bind(end_date);
        }
        if let Some(progress) = patch.progress {
            query = query.bind(progress);
        }

        query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        self.fetch(id).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Tasks and note links go with the project via ON DELETE CASCADE;
        // the linked notes themselves are untouched.
        let result = sqlx::query("DELETE FROM project WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Project {} not found", id)));
        }
        debug!("Deleted project {}", id);
        Ok(())
    }

    async fn stats(&self) -> Result<ProjectStats> {
        let (total_projects, active_projects, completed_projects): (i64, i64, i64) =
            sqlx::query_as(
                "SELECT COUNT(*), \
                 COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0), \
                 COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0) \
                 FROM project",
            )
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        let (total_tasks, completed_tasks): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
             COALESCE(SUM(CASE WHEN status = 'done' THEN 1 ELSE 0 END), 0) \
             FROM project_task",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let recent_projects = sqlx::query_as::<_, RecentProject>(
            "SELECT id, name, status, progress, updated_at FROM project \
             ORDER BY updated_at DESC LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(ProjectStats {
            total_projects,
            active_projects,
            completed_projects,
            total_tasks,
            completed_tasks,
            recent_projects,
        })
    }
}
