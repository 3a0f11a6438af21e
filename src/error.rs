//! Error types for the `tvfeed-rs` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, TvError>`.
//!
//! [`TvError`] covers:
//! - **Configuration errors** — No cached token and no credentials supplied
//! - **Authentication errors** — Sign-in request failed or returned no token
//! - **Connection errors** — WebSocket transport failures and timeouts
//! - **Parse errors** — Malformed frames or no series payload in the stream
//! - **HTTP / JSON / URL errors** — Used by the symbol-search endpoint
//! - **Invalid arguments** — Client-side validation errors

use std::time::Duration;

/// All possible errors produced by the `tvfeed-rs` client.
#[derive(Debug, thiserror::Error)]
pub enum TvError {
    /// The client could not be configured (e.g. no token and no credentials).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The sign-in request failed or its response lacked a token.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A WebSocket-level error (connect, send, or receive).
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A WebSocket connect or read did not complete in time.
    #[error("WebSocket timed out after {0:?}")]
    Timeout(Duration),

    /// The streamed data could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The server returned an unexpected HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to serialize or deserialize JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The caller provided an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TvError {
    /// Returns `true` for socket-level failures (transport error or timeout).
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::WebSocket(_) | Self::Timeout(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TvError>;
