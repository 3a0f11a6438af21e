//! # tvfeed-rs
//!
//! An unofficial async Rust client for TradingView's chart data feed.
//!
//! The crate signs in (or reuses a cached token), speaks the framed
//! `~m~<len>~m~<json>` WebSocket protocol, replays the chart/quote session
//! handshake, and reconstructs historical OHLCV bars from the stream.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tvfeed_rs::TvClient;
//! use tvfeed_rs::types::historical::HistoricalRequest;
//!
//! #[tokio::main]
//! async fn main() -> tvfeed_rs::Result<()> {
//!     let client = TvClient::new(Some("username"), Some("password")).await?;
//!     let hist = client
//!         .get_hist(&HistoricalRequest::new("NIFTY", "NSE").fut_contract(1))
//!         .await?;
//!     println!("{} bars for {}", hist.len(), hist.symbol);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod session;
pub mod token_store;
pub mod types;
pub mod ws;

/// Re-export the main client type at crate root for convenience.
pub use client::TvClient;
/// Re-export the error type and Result alias.
pub use error::{Result, TvError};
