//! Bar reconstruction from accumulated stream text.

mod common;

use chrono::{TimeZone, Utc};
use tvfeed_rs::error::TvError;
use tvfeed_rs::ws::bars::{parse_bars, parse_historical};

use common::{WireBar, bars, server_hello, series_completed, timescale_update};

fn stream(parts: &[String]) -> String {
    parts.iter().map(|p| format!("{p}\n")).collect()
}

#[test]
fn parses_all_fields_positionally() {
    let raw = stream(&[
        server_hello(),
        timescale_update("cs_x", &[WireBar {
            ts: 1_700_000_000,
            open: 19_500.5,
            high: 19_620.0,
            low: 19_480.25,
            close: 19_610.75,
            volume: Some(1_234_567.0),
        }]),
        series_completed("cs_x"),
    ]);

    let parsed = parse_bars(&raw, "NSE:NIFTY1!").unwrap();
    assert_eq!(parsed.len(), 1);
    let bar = parsed[0];
    assert_eq!(bar.timestamp, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    assert_eq!(bar.open, 19_500.5);
    assert_eq!(bar.high, 19_620.0);
    assert_eq!(bar.low, 19_480.25);
    assert_eq!(bar.close, 19_610.75);
    assert_eq!(bar.volume, 1_234_567.0);
}

#[test]
fn ten_bars_in_ascending_order() {
    let raw = stream(&[timescale_update("cs_x", &bars(10)), series_completed("cs_x")]);

    let parsed = parse_bars(&raw, "NSE:TCS").unwrap();
    assert_eq!(parsed.len(), 10);
    assert!(parsed.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(parsed[9].volume, 10_000.0);
}

#[test]
fn missing_volume_on_last_bar_reads_as_zero() {
    let wire = vec![WireBar::nth(0), WireBar::nth(1), WireBar::nth(2).without_volume()];
    let raw = stream(&[timescale_update("cs_x", &wire)]);

    let parsed = parse_bars(&raw, "NSE:NIFTY").unwrap();
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0].volume, 1000.0);
    assert_eq!(parsed[1].volume, 2000.0);
    assert_eq!(parsed[2].volume, 0.0);
    assert_eq!(parsed[2].close, WireBar::nth(2).close);
}

#[test]
fn volume_detection_is_forward_only() {
    // Once a bar lacks volume, later bars report 0.0 even if they carry one.
    let wire = vec![WireBar::nth(0), WireBar::nth(1).without_volume(), WireBar::nth(2)];
    let raw = stream(&[timescale_update("cs_x", &wire)]);

    let parsed = parse_bars(&raw, "NSE:NIFTY").unwrap();
    let volumes: Vec<f64> = parsed.iter().map(|b| b.volume).collect();
    assert_eq!(volumes, vec![1000.0, 0.0, 0.0]);
}

#[test]
fn volumeless_series_reports_zero_everywhere() {
    let wire: Vec<WireBar> = bars(4).into_iter().map(WireBar::without_volume).collect();
    let raw = stream(&[timescale_update("cs_x", &wire)]);

    let parsed = parse_bars(&raw, "TVC:DXY").unwrap();
    assert_eq!(parsed.len(), 4);
    assert!(parsed.iter().all(|b| b.volume == 0.0));
    assert_eq!(parsed[3].open, WireBar::nth(3).open);
}

#[test]
fn missing_series_block_is_a_parse_error() {
    let raw = stream(&[server_hello(), series_completed("cs_x")]);
    let err = parse_bars(&raw, "NSE:NOPE").unwrap_err();
    assert!(matches!(err, TvError::Parse(_)), "{err}");

    let err = parse_historical("", "NSE:NOPE").unwrap_err();
    assert!(matches!(err, TvError::Parse(_)), "{err}");
}

#[test]
fn empty_series_is_reported_as_no_data() {
    let raw = stream(&[timescale_update("cs_x", &[]), series_completed("cs_x")]);
    match parse_bars(&raw, "NSE:EMPTY").unwrap_err() {
        TvError::Parse(msg) => assert_eq!(msg, "no series data for NSE:EMPTY"),
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn malformed_price_is_a_parse_error() {
    let raw = r#"{"s":[{"i":0,"v":[1700000000.0,abc,1,1,1,1]}]}"#;
    let err = parse_bars(raw, "NSE:X").unwrap_err();
    assert!(matches!(err, TvError::Parse(_)), "{err}");
}

#[test]
fn historical_result_carries_symbol() {
    let raw = stream(&[timescale_update("cs_x", &bars(2))]);
    let hist = parse_historical(&raw, "NSE:NIFTY1!").unwrap();
    assert_eq!(hist.symbol, "NSE:NIFTY1!");
    assert_eq!(hist.len(), 2);
    assert_eq!(hist.last().unwrap().timestamp.timestamp(), common::BASE_TS + common::DAY);
}
