//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use atelier_core::{
    CreateNoteRequest, Error, ListNotesFilter, Note, NotePatch, NoteRepository, Result,
    ALL_NOTES_TAG,
};

const NOTE_COLUMNS: &str = "id, title, content, tag, created_at, updated_at, folder_id";

/// SQLite implementation of NoteRepository.
pub struct SqliteNoteRepository {
    pool: SqlitePool,
}

impl SqliteNoteRepository {
    /// Create a new SqliteNoteRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> Result<Note> {
        let sql = format!("SELECT {} FROM note WHERE id = ?", NOTE_COLUMNS);
        sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))
    }
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn list(&self, filter: ListNotesFilter) -> Result<Vec<Note>> {
        let mut sql = format!("SELECT {} FROM note WHERE 1=1 ", NOTE_COLUMNS);
        if filter.folder_id.is_some() {
            sql.push_str("AND folder_id = ? ");
        }
        if filter.search.is_some() {
            // instr() is a case-sensitive substring match, OR'd across the
            // three searchable fields.
            sql.push_str("AND (instr(title, ?) > 0 OR instr(content, ?) > 0 OR instr(tag, ?) > 0) ");
        }
        sql.push_str("ORDER BY updated_at DESC");

        let mut query = sqlx::query_as::<_, Note>(&sql);
        if let Some(folder_id) = filter.folder_id {
            query = query.bind(folder_id);
        }
        if let Some(ref search) = filter.search {
            query = query.bind(search).bind(search).bind(search);
        }

        query.fetch_all(&self.pool).await.map_err(Error::Database)
    }

    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO note (title, content, tag, created_at, updated_at, folder_id) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(&req.tag)
        .bind(now)
        .bind(now)
        .bind(req.folder_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        let id = result.last_insert_rowid();
        debug!("Created note {}", id);
        self.fetch(id).await
    }

    async fn update(&self, id: i64, patch: NotePatch) -> Result<Note> {
        // Confirm existence first so a no-op patch still 404s correctly.
        self.fetch(id).await?;

        let mut sets: Vec<&str> = vec!["updated_at = ?"];
        if patch.title.is_some() {
            sets.push("title = ?");
        }
        if patch.content.is_some() {
            sets.push("content = ?");
        }
        if patch.tag.is_some() {
            sets.push("tag = ?");
        }
        if patch.folder_id.is_some() {
            sets.push("folder_id = ?");
        }

        let sql = format!("UPDATE note SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql).bind(Utc::now());
        if let Some(title) = patch.title {
            query = query.bind(title);
        }
        if let Some(content) = patch.content {
            query = query.bind(content);
        }
        if let Some(tag) = patch.tag {
            query = query.bind(tag);
        }
        if let Some(folder_id) = patch.folder_id {
            // Some(None) binds NULL, clearing the folder reference.
            query = query.bind(folder_id);
        }

        query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        self.fetch(id).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Note {} not found", id)));
        }
        debug!("Deleted note {}", id);
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT tag FROM note WHERE tag IS NOT NULL AND tag != ''")
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?;

        let mut tags: Vec<String> = rows.into_iter().map(|(tag,)| tag).collect();
        // The sentinel "all notes" tag always leads, exactly once.
        tags.retain(|tag| tag != ALL_NOTES_TAG);
        tags.insert(0, ALL_NOTES_TAG.to_string());
        Ok(tags)
    }
}
