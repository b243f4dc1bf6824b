//! Credential store for the AI assist proxy.
//!
//! The API key lives in memory behind a lock and is injected into the
//! client rather than read from ambient process state on every call.
//! Updates are persisted to the `.env` file with an atomic temp-file
//! write followed by a rename.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::info;

use atelier_core::Result;

/// Environment variable holding the upstream API key.
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";

/// Shared, mutable credential holder with optional file persistence.
#[derive(Clone)]
pub struct CredentialStore {
    key: Arc<RwLock<Option<String>>>,
    env_path: Option<PathBuf>,
}

impl CredentialStore {
    /// Create a store with an initial key and a `.env` path for persistence.
    pub fn new(initial: Option<String>, env_path: Option<PathBuf>) -> Self {
        Self {
            key: Arc::new(RwLock::new(initial)),
            env_path,
        }
    }

    /// Create a store seeded from the process environment, persisting
    /// updates to `.env` in the working directory.
    pub fn from_env() -> Self {
        let initial = std::env::var(ENV_API_KEY).ok().filter(|k| !k.is_empty());
        Self::new(initial, Some(PathBuf::from(".env")))
    }

    /// Create a store with no file persistence (tests, ephemeral setups).
    pub fn in_memory(initial: Option<String>) -> Self {
        Self::new(initial, None)
    }

    /// Current key, if configured.
    pub fn get(&self) -> Option<String> {
        let guard = match self.key.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone()
    }

    /// Whether a key is currently configured.
    pub fn is_configured(&self) -> bool {
        self.get().is_some()
    }

    /// Replace the key, persisting to the configured `.env` file.
    pub fn set(&self, new_key: &str) -> Result<()> {
        if let Some(ref path) = self.env_path {
            persist_env_key(path, new_key)?;
        }
        let mut guard = match self.key.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(new_key.to_string());
        info!("AI API key updated");
        Ok(())
    }
}

/// Rewrite the env file with the new key, preserving unrelated lines.
///
/// The replacement is atomic: the new content is written to a sibling
/// temp file and renamed over the original.
fn persist_env_key(path: &Path, new_key: &str) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let key_line = format!("{}=\"{}\"", ENV_API_KEY, new_key);
    let mut lines: Vec<String> = Vec::new();
    let mut replaced = false;
    for line in existing.lines() {
        if line.trim_start().starts_with(&format!("{}=", ENV_API_KEY)) {
            if !replaced {
                lines.push(key_line.clone());
                replaced = true;
            }
        } else {
            lines.push(line.to_string());
        }
    }
    if !replaced {
        lines.push(key_line);
    }

    let mut content = lines.join("\n");
    content.push('\n');

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(".env");
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name));
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
