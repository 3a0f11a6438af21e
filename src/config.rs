//! Client configuration and builder.
//!
//! [`ClientConfig`] holds every tunable of a [`TvClient`]: credentials, the
//! token cache location, endpoint URLs, and timeouts. Defaults point at the
//! production endpoints. [`TvClientBuilder`] sets fields fluently and then
//! performs the async construction (token load or sign-in).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::TvClient;
use crate::constants::{DEFAULT_TIMEOUT_SECS, SEARCH_URL, SIGN_IN_URL, WS_ORIGIN, WS_URL};
use crate::error::Result;
use crate::token_store::default_cache_path;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a [`TvClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Account username, required only when no cached token exists.
    pub username: Option<String>,
    /// Account password, required only when no cached token exists.
    pub password: Option<String>,
    /// Token cache file. A leading `~/` is expanded.
    pub token_cache_path: PathBuf,
    /// Chart data WebSocket endpoint.
    pub ws_url: String,
    /// `Origin` header sent with the WebSocket upgrade.
    pub ws_origin: String,
    /// Sign-in endpoint.
    pub sign_in_url: String,
    /// Symbol search endpoint.
    pub search_url: String,
    /// Bound on the WebSocket connect. Default: 5 s.
    pub connect_timeout: Duration,
    /// Bound on each WebSocket read. Default: 5 s.
    pub read_timeout: Duration,
    /// Bound on each HTTP request (sign-in, search). Default: 5 s.
    pub http_timeout: Duration,
    /// Overall budget for the streaming phase of one fetch. Default: none.
    pub fetch_timeout: Option<Duration>,
    /// Log every outbound frame at `info` level.
    pub debug: bool,
    /// Seed for session id generation; `None` uses OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        Self {
            username: None,
            password: None,
            token_cache_path: default_cache_path(),
            ws_url: WS_URL.to_owned(),
            ws_origin: WS_ORIGIN.to_owned(),
            sign_in_url: SIGN_IN_URL.to_owned(),
            search_url: SEARCH_URL.to_owned(),
            connect_timeout: timeout,
            read_timeout: timeout,
            http_timeout: timeout,
            fetch_timeout: None,
            debug: false,
            rng_seed: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("token_cache_path", &self.token_cache_path)
            .field("ws_url", &self.ws_url)
            .field("ws_origin", &self.ws_origin)
            .field("sign_in_url", &self.sign_in_url)
            .field("search_url", &self.search_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("http_timeout", &self.http_timeout)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("debug", &self.debug)
            .field("rng_seed", &self.rng_seed)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`TvClient`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tvfeed_rs::config::TvClientBuilder;
///
/// # #[tokio::main]
/// # async fn main() -> tvfeed_rs::Result<()> {
/// let client = TvClientBuilder::new()
///     .credentials("user", "pass")
///     .token_cache_path("/tmp/tv_token.json")
///     .fetch_timeout(Duration::from_secs(30))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TvClientBuilder {
    config: ClientConfig,
}

impl TvClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Username and password used when no cached token is available.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self
    }

    /// Set the token cache file. Default: `~/.tv_token.json`.
    pub fn token_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.token_cache_path = path.into();
        self
    }

    /// Point the client at a different WebSocket endpoint.
    pub fn ws_url(mut self, url: impl Into<String>) -> Self {
        self.config.ws_url = url.into();
        self
    }

    /// Override the `Origin` header of the WebSocket upgrade.
    pub fn ws_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.ws_origin = origin.into();
        self
    }

    /// Point the client at a different sign-in endpoint.
    pub fn sign_in_url(mut self, url: impl Into<String>) -> Self {
        self.config.sign_in_url = url.into();
        self
    }

    /// Point the client at a different symbol-search endpoint.
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.config.search_url = url.into();
        self
    }

    /// Set the WebSocket connect timeout. Default: 5 s.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the per-read WebSocket timeout. Default: 5 s.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set the HTTP request timeout. Default: 5 s.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// Cap the streaming phase of each fetch. Default: unbounded.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = Some(timeout);
        self
    }

    /// Log every outbound frame. Default: false.
    pub fn debug(mut self, enable: bool) -> Self {
        self.config.debug = enable;
        self
    }

    /// Make session ids deterministic.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    /// The configuration accumulated so far.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the [`TvClient`], loading the cached token or signing in.
    pub async fn build(self) -> Result<TvClient> {
        TvClient::from_config(self.config).await
    }
}
