//! Historical bar types — request parameters, bars, and fetch results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::enums::{Interval, SessionMode};
use crate::types::symbol::format_symbol;

// ---------------------------------------------------------------------------
// Historical request
// ---------------------------------------------------------------------------

/// Parameters of a single historical fetch.
///
/// Built with [`HistoricalRequest::new`] and the chainable setters; the
/// defaults are exchange `NSE`, daily interval, 10 bars, no futures contract,
/// regular session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRequest {
    /// Ticker, or a fully qualified `EXCHANGE:TICKER` (exchange is then ignored).
    pub symbol: String,
    /// Exchange prefix applied to unqualified symbols.
    pub exchange: String,
    pub interval: Interval,
    /// Number of bars to request. The service rejects very large counts
    /// (around 5000), but nothing is enforced locally.
    pub n_bars: u32,
    /// Continuous futures contract (1 = front month, 2 = next, ...).
    pub fut_contract: Option<u32>,
    pub extended_session: bool,
}

impl HistoricalRequest {
    pub fn new(symbol: impl Into<String>, exchange: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
            interval: Interval::Daily,
            n_bars: 10,
            fut_contract: None,
            extended_session: false,
        }
    }

    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn n_bars(mut self, n_bars: u32) -> Self {
        self.n_bars = n_bars;
        self
    }

    pub fn fut_contract(mut self, contract: u32) -> Self {
        self.fut_contract = Some(contract);
        self
    }

    pub fn extended_session(mut self, extended: bool) -> Self {
        self.extended_session = extended;
        self
    }

    /// The symbol as it is sent on the wire (see [`format_symbol`]).
    pub fn formatted_symbol(&self) -> String {
        format_symbol(&self.symbol, &self.exchange, self.fut_contract)
    }

    pub fn session_mode(&self) -> SessionMode {
        SessionMode::from_extended(self.extended_session)
    }
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// One OHLCV bar.
///
/// `volume` is `0.0` for instruments that carry no volume (indices, some
/// forex pairs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time.
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// The outcome of one historical fetch: the resolved symbol and its bars in
/// the order the server emitted them (ascending by time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalResult {
    /// The symbol as sent to the server, e.g. `NSE:NIFTY1!`.
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl HistoricalResult {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar, if any.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}
