//! On-disk cache for the auth token.
//!
//! The cache is a single JSON object `{ "token": "<string>" }`. Both reads and
//! writes are best-effort: a missing or corrupt file reads as "no token", and a
//! failed write is logged and otherwise ignored, since the in-memory token is
//! still usable for the current process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::constants::DEFAULT_TOKEN_CACHE_FILE;

#[derive(Debug, Serialize, Deserialize)]
struct CachedToken {
    token: String,
}

/// Token cache bound to one file path.
///
/// Cloning shares the underlying lock, so clones never interleave reads and
/// writes of the same file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl TokenStore {
    /// Create a store at `path`. A leading `~/` is expanded to the home directory.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_home(path.as_ref()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// The resolved cache file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached token, or `None` if it is missing or unreadable.
    pub async fn load(&self) -> Option<String> {
        let _guard = self.lock.lock().await;

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), "no cached token: {e}");
                return None;
            }
        };

        match serde_json::from_slice::<CachedToken>(&bytes) {
            Ok(cached) if !cached.token.is_empty() => Some(cached.token),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(
                    path = %self.path.display(),
                    "ignoring unreadable token cache: {e}"
                );
                None
            }
        }
    }

    /// Persist `token`. Failures are logged as warnings and never returned.
    pub async fn save(&self, token: &str) {
        let _guard = self.lock.lock().await;

        let body = match serde_json::to_vec(&CachedToken {
            token: token.to_owned(),
        }) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("failed to encode token cache: {e}");
                return;
            }
        };

        match tokio::fs::write(&self.path, body).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "token cached"),
            Err(e) => tracing::warn!(path = %self.path.display(), "failed to save token: {e}"),
        }
    }
}

/// `<home>/.tv_token.json`, falling back to the working directory when no home
/// directory is known.
pub fn default_cache_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(DEFAULT_TOKEN_CACHE_FILE),
        None => PathBuf::from(DEFAULT_TOKEN_CACHE_FILE),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
