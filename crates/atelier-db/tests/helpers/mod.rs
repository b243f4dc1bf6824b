//! Shared fixtures for atelier-db integration tests.

use atelier_db::{Database, PoolConfig};

/// Open a fresh in-memory database with the schema applied.
///
/// A single connection is required: every SQLite `:memory:` connection
/// would otherwise see its own empty database.
pub async fn test_db() -> Database {
    let db = Database::connect_with("sqlite::memory:", PoolConfig::new().max_connections(1))
        .await
        .expect("failed to open in-memory database");
    db.migrate().await.expect("failed to run migrations");
    db
}

/// Insert a folder row directly (folders are read-only over the API).
pub async fn insert_folder(db: &Database, name: &str) -> i64 {
    sqlx::query("INSERT INTO folder (name) VALUES (?)")
        .bind(name)
        .execute(&db.pool)
        .await
        .expect("failed to insert folder")
        .last_insert_rowid()
}
