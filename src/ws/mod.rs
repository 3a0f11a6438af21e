//! WebSocket protocol engine for historical chart data.
//!
//! One historical fetch is one WebSocket connection:
//!
//! 1. [`connection`] opens `wss://data.tradingview.com/socket.io/websocket`
//!    with the required `Origin` header.
//! 2. [`chart_session`] replays the fixed nine-message handshake and then
//!    accumulates raw text until `series_completed`.
//! 3. [`bars`] recovers the ordered OHLCV bars from that text.
//!
//! [`codec`] implements the `~m~<len>~m~<payload>` framing shared by all of
//! them.

pub mod bars;
pub mod chart_session;
pub mod codec;
pub mod connection;
