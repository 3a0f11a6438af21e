//! Symbol formatting and symbol-search result types.

use serde::{Deserialize, Serialize};

/// Normalize a caller-supplied symbol into the `EXCHANGE:TICKER` form.
///
/// - A symbol already containing `:` is returned verbatim; `exchange` and
///   `contract` are ignored.
/// - With a futures contract `N`, the result is `EXCHANGE:TICKER<N>!`
///   (continuous contract, `1` = front month).
///
/// ```
/// use tvfeed_rs::types::symbol::format_symbol;
///
/// assert_eq!(format_symbol("NIFTY", "NSE", Some(1)), "NSE:NIFTY1!");
/// assert_eq!(format_symbol("BINANCE:BTCUSDT", "NSE", None), "BINANCE:BTCUSDT");
/// ```
pub fn format_symbol(symbol: &str, exchange: &str, contract: Option<u32>) -> String {
    if symbol.contains(':') {
        return symbol.to_owned();
    }
    match contract {
        Some(n) => format!("{exchange}:{symbol}{n}!"),
        None => format!("{exchange}:{symbol}"),
    }
}

/// One candidate returned by the symbol-search endpoint.
///
/// Only the commonly present fields are typed; the endpoint returns many more
/// which are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSearchResult {
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    /// Instrument type (e.g. `"stock"`, `"futures"`, `"index"`).
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Root ticker of a futures chain (e.g. `"NIFTY"`).
    #[serde(default)]
    pub prefix: Option<String>,
}

impl SymbolSearchResult {
    /// The `EXCHANGE:SYMBOL` form accepted by
    /// [`TvClient::get_hist`](crate::client::TvClient::get_hist).
    pub fn qualified(&self) -> String {
        format_symbol(&self.symbol, &self.exchange, None)
    }
}
