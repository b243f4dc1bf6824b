//! atelier HTTP API server.
//!
//! Serves the REST surface over the SQLite store plus the AI assist
//! proxy. Routes are versionless under `/api`; errors are returned as
//! `{"error": message}` JSON with a meaningful status code.

use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_assist::{AssistClient, AssistConfig, CredentialStore};
use atelier_db::Database;

mod handlers;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database context with all repositories.
    pub db: Database,
    /// AI assist client.
    pub assist: AssistClient,
}

/// API error responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 404 Not Found
    NotFound(String),
    /// 409 Conflict
    Conflict(String),
    /// 500 Internal Server Error
    Internal(String),
    /// 503 Service Unavailable
    ServiceUnavailable(String),
}

impl From<atelier_core::Error> for ApiError {
    fn from(err: atelier_core::Error) -> Self {
        use atelier_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Config(msg) => ApiError::ServiceUnavailable(msg),
            Error::Upstream(msg) => ApiError::Internal(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Health check.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the application router.
///
/// `/api/projects/stats` is registered as a static route; axum matches
/// it ahead of `/api/projects/:id`.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Folders and notes
        .route("/api/folders", get(handlers::notes::list_folders))
        .route(
            "/api/notes",
            get(handlers::notes::list_notes).post(handlers::notes::create_note),
        )
        .route(
            "/api/notes/:id",
            put(handlers::notes::update_note).delete(handlers::notes::delete_note),
        )
        .route("/api/tags", get(handlers::notes::list_tags))
        // Todos
        .route(
            "/api/todos",
            get(handlers::todos::list_todos).post(handlers::todos::create_todo),
        )
        .route(
            "/api/todos/:id",
            put(handlers::todos::update_todo).delete(handlers::todos::delete_todo),
        )
        // Projects
        .route(
            "/api/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route("/api/projects/stats", get(handlers::projects::project_stats))
        .route(
            "/api/projects/:id",
            put(handlers::projects::update_project).delete(handlers::projects::delete_project),
        )
        .route(
            "/api/projects/:id/tasks",
            get(handlers::projects::list_project_tasks)
                .post(handlers::projects::create_project_task),
        )
        .route(
            "/api/project-tasks/:id",
            put(handlers::projects::update_project_task)
                .delete(handlers::projects::delete_project_task),
        )
        .route(
            "/api/projects/:id/notes",
            get(handlers::projects::list_project_notes)
                .post(handlers::projects::link_note_to_project),
        )
        .route(
            "/api/projects/:id/notes/:note_id",
            delete(handlers::projects::unlink_note_from_project),
        )
        // AI assist
        .route(
            "/api/ai/generate-title",
            post(handlers::assist::generate_title),
        )
        .route(
            "/api/ai/polish-content",
            post(handlers::assist::polish_content),
        )
        .route(
            "/api/ai/generate-tags",
            post(handlers::assist::generate_tags),
        )
        // AI configuration
        .route("/api/config", get(handlers::assist::config_status))
        .route("/api/config/api-key", post(handlers::assist::set_api_key))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://atelier.db?mode=rwc".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    info!("Connecting to database: {}", database_url);
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;
    info!("Database ready");

    let assist = AssistClient::new(AssistConfig::from_env(), CredentialStore::from_env())?;

    let state = AppState { db, assist };
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
