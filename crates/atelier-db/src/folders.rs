//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use atelier_core::{Error, Folder, FolderRepository, Result};

/// SQLite implementation of FolderRepository.
pub struct SqliteFolderRepository {
    pool: SqlitePool,
}

impl SqliteFolderRepository {
    /// Create a new SqliteFolderRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for SqliteFolderRepository {
    async fn list(&self) -> Result<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT id, name FROM folder")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
