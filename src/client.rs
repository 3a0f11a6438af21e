//! The public client for historical chart data.
//!
//! [`TvClient`] owns the auth token and the quote/chart session ids for its
//! whole lifetime. Every [`get_hist`](TvClient::get_hist) call opens its own
//! WebSocket, replays the handshake, drains the series and closes the socket;
//! nothing is pooled between calls.
//!
//! # Token policy
//!
//! At construction the token cache is read first. Only when it holds no
//! token are the configured credentials used to sign in, and the fresh token
//! is written back to the cache. With neither a cached token nor credentials,
//! construction fails with [`TvError::Configuration`] before any request is
//! made.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::Instant;

use crate::api::auth::authenticate;
use crate::config::{ClientConfig, TvClientBuilder};
use crate::error::{Result, TvError};
use crate::session::SessionIds;
use crate::token_store::TokenStore;
use crate::types::historical::{HistoricalRequest, HistoricalResult};
use crate::ws::bars::parse_historical;
use crate::ws::chart_session::{ChartSession, StreamEnd};
use crate::ws::connection::ProtocolConnection;

/// Client for historical OHLCV bars.
///
/// # Example
///
/// ```no_run
/// use tvfeed_rs::TvClient;
/// use tvfeed_rs::types::{Interval, historical::HistoricalRequest};
///
/// # #[tokio::main]
/// # async fn main() -> tvfeed_rs::Result<()> {
/// let client = TvClient::builder().credentials("user", "pass").build().await?;
///
/// let req = HistoricalRequest::new("NIFTY", "NSE")
///     .fut_contract(1)
///     .interval(Interval::Daily)
///     .n_bars(10);
/// let hist = client.get_hist(&req).await?;
/// for bar in &hist.bars {
///     println!("{} {} {}", bar.timestamp, bar.close, bar.volume);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TvClient {
    http: reqwest::Client,
    config: ClientConfig,
    token_store: TokenStore,
    /// Auth token sent in `set_auth_token`.
    token: String,
    sessions: SessionIds,
}

impl TvClient {
    /// Start building a client with default configuration.
    pub fn builder() -> TvClientBuilder {
        TvClientBuilder::new()
    }

    /// Construct a client with default configuration, signing in with the
    /// given credentials only if no token is cached.
    pub async fn new(username: Option<&str>, password: Option<&str>) -> Result<Self> {
        let config = ClientConfig {
            username: username.map(str::to_owned),
            password: password.map(str::to_owned),
            ..ClientConfig::default()
        };
        Self::from_config(config).await
    }

    /// Construct a client from a full configuration.
    pub async fn from_config(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        let token_store = TokenStore::new(&config.token_cache_path);

        let token = match token_store.load().await {
            Some(token) => {
                tracing::debug!(path = %token_store.path().display(), "using cached token");
                token
            }
            None => {
                let (Some(username), Some(password)) =
                    (config.username.as_deref(), config.password.as_deref())
                else {
                    return Err(TvError::Configuration(
                        "no cached token; username and password are required".into(),
                    ));
                };
                let token = authenticate(&http, &config.sign_in_url, username, password).await?;
                token_store.save(&token).await;
                token
            }
        };

        let sessions = match config.rng_seed {
            Some(seed) => SessionIds::generate(&mut StdRng::seed_from_u64(seed)),
            None => SessionIds::generate(&mut rand::thread_rng()),
        };
        tracing::debug!(quote = %sessions.quote, chart = %sessions.chart, "session ids generated");

        Ok(Self {
            http,
            config,
            token_store,
            token,
            sessions,
        })
    }

    /// Returns the auth token in use.
    pub fn cached_token(&self) -> &str {
        &self.token
    }

    /// Returns the quote and chart session ids reused by every fetch.
    pub fn sessions(&self) -> &SessionIds {
        &self.sessions
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    /// Returns a reference to the underlying `reqwest::Client`.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Fetch historical bars for one symbol over a fresh WebSocket.
    ///
    /// A stream that breaks off before `series_completed` is still parsed; the
    /// result then holds the bars received so far. If nothing usable arrived
    /// the call fails with [`TvError::Parse`].
    pub async fn get_hist(&self, request: &HistoricalRequest) -> Result<HistoricalResult> {
        let symbol = request.formatted_symbol();
        tracing::debug!(
            %symbol,
            interval = %request.interval,
            n_bars = request.n_bars,
            "getting data"
        );

        let connection = ProtocolConnection::open(&self.config).await?;
        let mut session = ChartSession::new(connection);

        let deadline = self.config.fetch_timeout.map(|d| Instant::now() + d);
        let output = session
            .run(&self.token, &self.sessions, request, deadline)
            .await?;
        session.into_transport().close().await;

        match &output.end {
            StreamEnd::Completed => {}
            StreamEnd::ServerError(name) => {
                tracing::warn!(%symbol, "server answered {name}");
            }
            StreamEnd::Interrupted(e) => {
                tracing::warn!(%symbol, "stream interrupted, using partial data: {e}");
            }
            StreamEnd::DeadlineElapsed => {
                tracing::warn!(%symbol, "fetch timeout elapsed, using partial data");
            }
        }

        parse_historical(&output.raw, &symbol)
    }
}
