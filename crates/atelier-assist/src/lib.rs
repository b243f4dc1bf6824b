//! # atelier-assist
//!
//! AI assist proxy for atelier.
//!
//! Forwards note content to an OpenAI-compatible chat completions
//! endpoint for title generation, content polishing, and tag
//! suggestion. The API credential is held in an injected
//! [`CredentialStore`] rather than read from ambient process state.

pub mod client;
pub mod credentials;
pub mod types;

pub use client::{
    excerpt, AssistClient, AssistConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
    EXCERPT_CHAR_LIMIT,
};
pub use credentials::{CredentialStore, ENV_API_KEY};
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
