//! AI assist client.
//!
//! Stateless pass-through to an OpenAI-compatible chat completions
//! endpoint. Each operation sends a fixed system instruction and a
//! bounded response-length hint; calls are single-attempt with an
//! explicit timeout.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use atelier_core::{Error, Result};

use crate::credentials::CredentialStore;
use crate::types::*;

/// Default OpenRouter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default request timeout in seconds. One attempt, no retries.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Content longer than this is truncated before title/tag generation.
pub const EXCERPT_CHAR_LIMIT: usize = 500;

const TITLE_SYSTEM_PROMPT: &str =
    "你是一个专业的标题生成器。请根据提供的文本内容生成一个简洁、有吸引力的标题，不超过20个字。";
const POLISH_SYSTEM_PROMPT: &str =
    "你是一个专业的文本润色专家。请对提供的文本进行润色，使其更加通顺、专业，保持原意不变。";
const TAGS_SYSTEM_PROMPT: &str =
    "你是一个标签生成专家。请根据提供的文本内容生成3-5个相关的标签，用逗号分隔。标签应该简洁、准确，能够概括文本的主要内容和主题。";

/// Configuration for the assist client.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Model slug used for all assist operations.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AssistConfig {
    /// Create a configuration from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ATELIER_AI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("ATELIER_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_seconds: std::env::var("ATELIER_AI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Truncate content for prompt inclusion, marking the cut with an ellipsis.
pub fn excerpt(content: &str) -> String {
    if content.chars().count() > EXCERPT_CHAR_LIMIT {
        let head: String = content.chars().take(EXCERPT_CHAR_LIMIT).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

/// Client for the AI assist operations.
#[derive(Clone)]
pub struct AssistClient {
    client: Client,
    config: AssistConfig,
    credentials: CredentialStore,
}

impl AssistClient {
    /// Create a new assist client with the given configuration and
    /// credential store.
    pub fn new(config: AssistConfig, credentials: CredentialStore) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Upstream(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing assist client: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    /// The credential store backing this client.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn require_key(&self) -> Result<String> {
        self.credentials
            .get()
            .ok_or_else(|| Error::Config("AI API key is not configured".to_string()))
    }

    async fn chat(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens: Some(max_tokens),
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!("Assist request: model={}", self.config.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<UpstreamErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => "Unknown error".to_string(),
            };
            warn!("Assist request failed: {} {}", status, message);
            return Err(Error::Upstream(format!(
                "AI service returned {}: {}",
                status, message
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Malformed AI response: {}", e)))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream("AI response contained no choices".to_string()))?;
        Ok(choice.message.content)
    }

    /// Generate a short title for note content.
    pub async fn generate_title(&self, content: &str) -> Result<String> {
        let key = self.require_key()?;
        let user = format!("请为这个笔记内容生成一个标题：\n\n{}", excerpt(content));
        let raw = self.chat(&key, TITLE_SYSTEM_PROMPT, &user, 50).await?;
        Ok(raw.trim().replace('"', ""))
    }

    /// Polish note content, preserving its meaning.
    pub async fn polish_content(&self, content: &str) -> Result<String> {
        let key = self.require_key()?;
        let user = format!("请润色这段文本：\n\n{}", content);
        let raw = self.chat(&key, POLISH_SYSTEM_PROMPT, &user, 1000).await?;
        Ok(raw.trim().to_string())
    }

    /// Suggest 3-5 tags for note content.
    pub async fn generate_tags(&self, content: &str) -> Result<Vec<String>> {
        let key = self.require_key()?;
        let user = format!("请为这个笔记内容生成标签：\n\n{}", excerpt(content));
        let raw = self.chat(&key, TAGS_SYSTEM_PROMPT, &user, 100).await?;

        let tags = raw
            .split(',')
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        Ok(tags)
    }

    /// Probe the upstream service with a candidate key.
    ///
    /// Returns Ok(true) when the service accepts the key, Ok(false) when
    /// it rejects it, and Err only on transport failures.
    pub async fn validate_key(&self, candidate: &str) -> Result<bool> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user("test")],
            max_tokens: Some(1),
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", candidate))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
