//! Project-note link repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use atelier_core::{Error, Note, ProjectNoteLink, ProjectNoteRepository, Result};

/// SQLite implementation of ProjectNoteRepository.
pub struct SqliteProjectNoteRepository {
    pool: SqlitePool,
}

impl SqliteProjectNoteRepository {
    /// Create a new SqliteProjectNoteRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn ensure_project_exists(&self, project_id: i64) -> Result<()> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM project WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        if row.is_none() {
            return Err(Error::NotFound(format!("Project {} not found", project_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectNoteRepository for SqliteProjectNoteRepository {
    async fn list_notes(&self, project_id: i64) -> Result<Vec<Note>> {
        self.ensure_project_exists(project_id).await?;

        sqlx::query_as::<_, Note>(
            "SELECT n.id, n.title, n.content, n.tag, n.created_at, n.updated_at, n.folder_id \
             FROM note n \
             JOIN project_note pn ON pn.note_id = n.id \
             WHERE pn.project_id = ? \
             ORDER BY n.updated_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn link(&self, project_id: i64, note_id: i64) -> Result<ProjectNoteLink> {
        self.ensure_project_exists(project_id).await?;

        let note: Option<(i64,)> = sqlx::query_as("SELECT id FROM note WHERE id = ?")
            .bind(note_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        if note.is_none() {
            return Err(Error::NotFound(format!("Note {} not found", note_id)));
        }

        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM project_note WHERE project_id = ? AND note_id = ?",
        )
        .bind(project_id)
        .bind(note_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        if existing.is_some() {
            return Err(Error::Conflict("Note already linked to project".to_string()));
        }

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO project_note (project_id, note_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(project_id)
        .bind(note_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            // The UNIQUE(project_id, note_id) constraint backstops the
            // existence check above under concurrent linking.
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Error::Conflict("Note already linked to project".to_string())
            }
            _ => Error::Database(e),
        })?;

        debug!("Linked note {} to project {}", note_id, project_id);
        Ok(ProjectNoteLink {
            id: result.last_insert_rowid(),
            project_id,
            note_id,
            created_at: now,
        })
    }

    async fn unlink(&self, project_id: i64, note_id: i64) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM project_note WHERE project_id = ? AND note_id = ?")
                .bind(project_id)
                .bind(note_id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Link between project {} and note {} not found",
                project_id, note_id
            )));
        }
        debug!("Unlinked note {} from project {}", note_id, project_id);
        Ok(())
    }
}
