//! Constants for the TradingView chart data feed.
//!
//! Contains endpoint URLs, required headers, timeouts, and the fixed protocol
//! aliases used during the chart handshake. These are used internally by
//! [`TvClient`](crate::client::TvClient) and the WebSocket types, but are also
//! exported for advanced usage.

// ---------------------------------------------------------------------------
// HTTP endpoints
// ---------------------------------------------------------------------------

/// Sign-in endpoint exchanging username/password for an auth token.
pub const SIGN_IN_URL: &str = "https://www.tradingview.com/accounts/signin/";

/// `Referer` header value required by the sign-in endpoint.
pub const SIGN_IN_REFERER: &str = "https://www.tradingview.com";

/// Symbol search endpoint (query parameters are appended by the client).
pub const SEARCH_URL: &str = "https://symbol-search.tradingview.com/symbol_search/";

// ---------------------------------------------------------------------------
// WebSocket
// ---------------------------------------------------------------------------

/// WebSocket endpoint for chart and quote sessions.
pub const WS_URL: &str = "wss://data.tradingview.com/socket.io/websocket";

/// `Origin` header the WebSocket endpoint insists on.
pub const WS_ORIGIN: &str = "https://data.tradingview.com";

/// Default connect and per-read timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

// ---------------------------------------------------------------------------
// Token cache
// ---------------------------------------------------------------------------

/// Default token cache file, relative to the user's home directory.
pub const DEFAULT_TOKEN_CACHE_FILE: &str = ".tv_token.json";

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Prefix of generated quote session ids.
pub const QUOTE_SESSION_PREFIX: &str = "qs";

/// Prefix of generated chart session ids.
pub const CHART_SESSION_PREFIX: &str = "cs";

/// Number of random lowercase letters in a session id.
pub const SESSION_ID_LEN: usize = 12;

/// Alias the resolved symbol is registered under in the chart session.
pub const SYMBOL_ALIAS: &str = "symbol_1";

/// Alias of the single series created per fetch.
pub const SERIES_ALIAS: &str = "s1";

/// In-band marker signalling the requested series has been fully sent.
pub const SERIES_COMPLETED: &str = "series_completed";

/// Server messages that end a stream without data.
pub const TERMINAL_ERRORS: [&str; 4] = [
    "symbol_error",
    "series_error",
    "critical_error",
    "protocol_error",
];

/// Quote fields the server is asked to report for the subscribed symbol.
pub const QUOTE_FIELDS: [&str; 23] = [
    "ch",
    "chp",
    "current_session",
    "description",
    "local_description",
    "language",
    "exchange",
    "fractional",
    "is_tradable",
    "lp",
    "lp_time",
    "minmov",
    "minmove2",
    "original_name",
    "pricescale",
    "pro_name",
    "short_name",
    "type",
    "update_mode",
    "volume",
    "currency_code",
    "rchp",
    "rtc",
];
