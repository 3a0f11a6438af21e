//! Bar reconstruction from accumulated stream text.
//!
//! Bars arrive inside a `timescale_update` message as
//!
//! ```text
//! "s":[{"i":0,"v":[1700000000.0,100.0,101.5,99.0,100.5,12345.0]},{"i":1,"v":[...]}]
//! ```
//!
//! The block is located textually and each record is split on `[ : , ]`,
//! which puts the epoch timestamp at field 4, open/high/low/close at 5..=8 and
//! volume at 9. Instruments without volume simply end the array after close.

use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;

use crate::error::{Result, TvError};
use crate::types::historical::{Bar, HistoricalResult};

// An empty `"s":[]` matches the first branch and captures nothing.
static SERIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""s":\[(?:\]|(.+?)\}\])"#).expect("series block pattern"));

const RECORD_SEPARATOR: &str = r#",{""#;
const FIELD_SEPARATORS: [char; 4] = ['[', ':', ',', ']'];

const TIMESTAMP_FIELD: usize = 4;
const OPEN_FIELD: usize = 5;
const VOLUME_FIELD: usize = 9;

/// Parse every bar in `raw`, in stream order.
///
/// Fails with [`TvError::Parse`] when no series block exists, which in
/// practice means a bad symbol, a bad exchange, or no data entitlement.
///
/// Volume detection is forward-only: once one record lacks a numeric volume,
/// that record and every later one report `0.0`, while earlier bars keep the
/// volume they were parsed with.
pub fn parse_bars(raw: &str, symbol: &str) -> Result<Vec<Bar>> {
    let Some(block) = SERIES_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        tracing::error!(%symbol, "no data, please check the exchange and symbol");
        return Err(TvError::Parse(format!("no series data for {symbol}")));
    };

    let mut bars = Vec::new();
    let mut has_volume = true;

    for (index, record) in block.split(RECORD_SEPARATOR).enumerate() {
        let fields: Vec<&str> = record.split(FIELD_SEPARATORS).collect();

        let ts = number(&fields, TIMESTAMP_FIELD)
            .ok_or_else(|| bad_record(symbol, index, "timestamp"))?;
        let timestamp = DateTime::from_timestamp_millis((ts * 1000.0).round() as i64)
            .ok_or_else(|| bad_record(symbol, index, "timestamp"))?;

        let mut ohlc = [0.0_f64; 4];
        for (offset, value) in ohlc.iter_mut().enumerate() {
            *value = number(&fields, OPEN_FIELD + offset)
                .ok_or_else(|| bad_record(symbol, index, "price"))?;
        }

        let volume = if has_volume {
            match number(&fields, VOLUME_FIELD) {
                Some(v) => v,
                None => {
                    tracing::debug!(%symbol, "no volume data");
                    has_volume = false;
                    0.0
                }
            }
        } else {
            0.0
        };

        let [open, high, low, close] = ohlc;
        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(bars)
}

/// [`parse_bars`] wrapped into a [`HistoricalResult`] for `symbol`.
pub fn parse_historical(raw: &str, symbol: &str) -> Result<HistoricalResult> {
    Ok(HistoricalResult {
        symbol: symbol.to_owned(),
        bars: parse_bars(raw, symbol)?,
    })
}

fn number(fields: &[&str], index: usize) -> Option<f64> {
    fields.get(index)?.trim().parse().ok()
}

fn bad_record(symbol: &str, index: usize, what: &str) -> TvError {
    TvError::Parse(format!("malformed {what} in bar record {index} for {symbol}"))
}
