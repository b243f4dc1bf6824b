//! # atelier-db
//!
//! SQLite database layer for atelier.
//!
//! This crate provides:
//! - Connection pool management (with foreign key enforcement)
//! - Repository implementations for all core entities
//! - Schema migrations from the workspace `migrations/` directory
//!
//! ## Example
//!
//! ```rust,ignore
//! use atelier_db::Database;
//! use atelier_core::{CreateNoteRequest, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://atelier.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let note = db.notes.insert(CreateNoteRequest {
//!         title: "Hello".to_string(),
//!         content: "world".to_string(),
//!         tag: "默认".to_string(),
//!         folder_id: None,
//!     }).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```

pub mod folders;
pub mod notes;
pub mod pool;
pub mod project_notes;
pub mod projects;
pub mod tasks;
pub mod todos;

// Re-export core types
pub use atelier_core::*;

// Re-export repository implementations
pub use folders::SqliteFolderRepository;
pub use notes::SqliteNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use project_notes::SqliteProjectNoteRepository;
pub use projects::SqliteProjectRepository;
pub use tasks::SqliteTaskRepository;
pub use todos::SqliteTodoRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::SqlitePool,
    /// Folder repository.
    pub folders: SqliteFolderRepository,
    /// Note repository for CRUD, search, and the tag index.
    pub notes: SqliteNoteRepository,
    /// Todo repository.
    pub todos: SqliteTodoRepository,
    /// Project repository for CRUD and aggregate stats.
    pub projects: SqliteProjectRepository,
    /// Project task repository (recomputes progress transactionally).
    pub tasks: SqliteTaskRepository,
    /// Project-note link repository.
    pub project_notes: SqliteProjectNoteRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            folders: SqliteFolderRepository::new(pool.clone()),
            notes: SqliteNoteRepository::new(pool.clone()),
            todos: SqliteTodoRepository::new(pool.clone()),
            projects: SqliteProjectRepository::new(pool.clone()),
            tasks: SqliteTaskRepository::new(pool.clone()),
            project_notes: SqliteProjectNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the database with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Connect with custom pool configuration.
    ///
    /// In-memory databases must use a single connection, since each SQLite
    /// `:memory:` connection sees its own database.
    pub async fn connect_with(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
