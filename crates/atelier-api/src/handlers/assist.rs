//! AI assist and API key configuration handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use atelier_core::MessageResponse;

use crate::{ApiError, AppState};

/// Request body for the content-based assist operations.
#[derive(Debug, Deserialize)]
pub struct AssistRequest {
    #[serde(default)]
    pub content: String,
}

/// Generated title response.
#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title: String,
}

/// Polished content response.
#[derive(Debug, Serialize)]
pub struct PolishResponse {
    pub polished: String,
}

/// Suggested tags response.
#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

/// AI configuration status.
#[derive(Debug, Serialize)]
pub struct ConfigStatus {
    pub has_api_key: bool,
}

/// Request body for setting the upstream API key.
#[derive(Debug, Deserialize)]
pub struct SetApiKeyRequest {
    #[serde(default)]
    pub api_key: String,
}

fn require_content(content: &str) -> Result<&str, ApiError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest("content is required".to_string()));
    }
    Ok(trimmed)
}

/// Generate a short title for note content.
pub async fn generate_title(
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> Result<Json<TitleResponse>, ApiError> {
    let content = require_content(&req.content)?;
    let title = state.assist.generate_title(content).await?;
    Ok(Json(TitleResponse { title }))
}

/// Polish note content, preserving its meaning.
pub async fn polish_content(
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> Result<Json<PolishResponse>, ApiError> {
    let content = require_content(&req.content)?;
    let polished = state.assist.polish_content(content).await?;
    Ok(Json(PolishResponse { polished }))
}

/// Suggest 3-5 tags for note content.
pub async fn generate_tags(
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> Result<Json<TagsResponse>, ApiError> {
    let content = require_content(&req.content)?;
    let tags = state.assist.generate_tags(content).await?;
    Ok(Json(TagsResponse { tags }))
}

/// Report whether an upstream API key is configured. The key itself is
/// never returned.
pub async fn config_status(State(state): State<AppState>) -> Json<ConfigStatus> {
    Json(ConfigStatus {
        has_api_key: state.assist.credentials().is_configured(),
    })
}

/// Validate and store a new upstream API key.
///
/// The candidate key is probed against the upstream service before it
/// replaces the stored one.
pub async fn set_api_key(
    State(state): State<AppState>,
    Json(req): Json<SetApiKeyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let candidate = req.api_key.trim();
    if candidate.is_empty() {
        return Err(ApiError::BadRequest("api_key is required".to_string()));
    }

    if !state.assist.validate_key(candidate).await? {
        return Err(ApiError::BadRequest(
            "API key validation failed".to_string(),
        ));
    }

    state.assist.credentials().set(candidate)?;
    Ok(Json(MessageResponse {
        message: "API key saved".to_string(),
    }))
}
