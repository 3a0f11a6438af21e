//! Shared fixtures: a scripted transport and builders for server packets.
#![allow(dead_code)]

use std::collections::VecDeque;

use tvfeed_rs::error::{Result, TvError};
use tvfeed_rs::ws::codec::{self, ProtocolMessage};
use tvfeed_rs::ws::connection::Transport;

/// Base timestamp for generated bars (2023-11-14T22:13:20Z).
pub const BASE_TS: i64 = 1_700_000_000;
pub const DAY: i64 = 86_400;

/// A transport that records what is sent and replays canned replies.
///
/// Once the replies run out, `receive` never resolves, like a stalled socket.
#[derive(Default)]
pub struct ScriptedTransport {
    pub sent: Vec<ProtocolMessage>,
    pub raw_sent: Vec<String>,
    pub replies: VecDeque<Result<String>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: replies.into(),
            ..Self::default()
        }
    }

    pub fn sent_names(&self) -> Vec<&str> {
        self.sent.iter().map(|m| m.name.as_str()).collect()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&mut self, message: &ProtocolMessage) -> Result<()> {
        self.sent.push(message.clone());
        Ok(())
    }

    async fn send_raw(&mut self, payload: &str) -> Result<()> {
        self.raw_sent.push(payload.to_owned());
        Ok(())
    }

    async fn receive(&mut self) -> Result<String> {
        match self.replies.pop_front() {
            Some(reply) => reply,
            None => std::future::pending().await,
        }
    }
}

/// One bar as the server sends it; `volume: None` omits the field.
#[derive(Debug, Clone, Copy)]
pub struct WireBar {
    pub ts: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl WireBar {
    pub fn nth(i: i64) -> Self {
        let base = 100.0 + i as f64;
        Self {
            ts: BASE_TS + i * DAY,
            open: base,
            high: base + 2.5,
            low: base - 1.5,
            close: base + 1.0,
            volume: Some(1000.0 * (i + 1) as f64),
        }
    }

    pub fn without_volume(mut self) -> Self {
        self.volume = None;
        self
    }

    fn values(&self) -> String {
        let mut v = format!(
            "{}.0,{},{},{},{}",
            self.ts, self.open, self.high, self.low, self.close
        );
        if let Some(vol) = self.volume {
            v.push_str(&format!(",{vol}"));
        }
        v
    }
}

pub fn bars(n: i64) -> Vec<WireBar> {
    (0..n).map(WireBar::nth).collect()
}

/// Wrap a payload in a frame header.
pub fn frame(payload: &str) -> String {
    codec::encode_raw(payload)
}

/// The JSON body of a `timescale_update` carrying `bars` for series `s1`.
pub fn timescale_update_json(chart_session: &str, bars: &[WireBar]) -> String {
    let records: Vec<String> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| format!(r#"{{"i":{i},"v":[{}]}}"#, b.values()))
        .collect();
    format!(
        r#"{{"m":"timescale_update","p":["{chart_session}",{{"s1":{{"node":"bc1","s":[{}],"ns":{{"d":"","indexes":[]}},"t":"s1","lbs":{{"bar_close_time":1}}}}}}]}}"#,
        records.join(",")
    )
}

pub fn timescale_update(chart_session: &str, bars: &[WireBar]) -> String {
    frame(&timescale_update_json(chart_session, bars))
}

pub fn series_completed(chart_session: &str) -> String {
    frame(&format!(
        r#"{{"m":"series_completed","p":["{chart_session}","s1","streaming","s1_1"]}}"#
    ))
}

pub fn server_hello() -> String {
    frame(r#"{"session_id":"<0.1.2>_abc","timestamp":1700000000,"release":"registry"}"#)
}

pub fn symbol_error(chart_session: &str) -> String {
    frame(&format!(
        r#"{{"m":"symbol_error","p":["{chart_session}","symbol_1","invalid symbol"]}}"#
    ))
}

pub fn heartbeat(n: u32) -> String {
    frame(&format!("~h~{n}"))
}

/// A receive failure as the socket would report it.
pub fn closed() -> Result<String> {
    Err(TvError::WebSocket(
        tokio_tungstenite::tungstenite::Error::ConnectionClosed,
    ))
}
