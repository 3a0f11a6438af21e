//! Wire framing for the chart data WebSocket.
//!
//! Every unit of data on the socket is a *frame*:
//!
//! ```text
//! ~m~<decimal byte length>~m~<payload>
//! ```
//!
//! A single WebSocket text message may carry several frames back to back.
//! Payloads are either a protocol message `{"m":"<name>","p":[...]}`, a
//! heartbeat `~h~<n>` that must be echoed back, or other JSON (the server
//! hello object).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TvError};

const HEADER_MARK: &str = "~m~";
const HEARTBEAT_MARK: &str = "~h~";

static MESSAGE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""m":"(.+?)","#).expect("message name pattern"));
static MESSAGE_PAYLOAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""p":(\[.+?\])\}"#).expect("message payload pattern"));

// ---------------------------------------------------------------------------
// Protocol message
// ---------------------------------------------------------------------------

/// A named remote call with an ordered parameter list.
///
/// Serializes as compact JSON with `m` before `p`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMessage {
    #[serde(rename = "m")]
    pub name: String,
    #[serde(rename = "p", default)]
    pub params: Vec<Value>,
}

impl ProtocolMessage {
    pub fn new(name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Compact JSON body, without the frame header.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// One decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Keep-alive, e.g. `~h~3`. Must be sent back verbatim.
    Heartbeat(String),
    /// A protocol message.
    Message(ProtocolMessage),
    /// Any other payload (the session hello, unknown JSON).
    Other(String),
}

impl Frame {
    fn classify(payload: &str) -> Self {
        if payload.starts_with(HEARTBEAT_MARK) {
            return Self::Heartbeat(payload.to_owned());
        }
        match serde_json::from_str::<ProtocolMessage>(payload) {
            Ok(msg) => Self::Message(msg),
            Err(_) => Self::Other(payload.to_owned()),
        }
    }

    /// Name of the carried protocol message, if any.
    pub fn message_name(&self) -> Option<&str> {
        match self {
            Self::Message(msg) => Some(&msg.name),
            _ => None,
        }
    }
}

/// Encode a protocol message into a single frame.
pub fn encode(message: &ProtocolMessage) -> Result<String> {
    Ok(encode_raw(&message.to_json()?))
}

/// Prefix an arbitrary payload with the frame header.
///
/// The declared length is the payload's UTF-8 byte length.
pub fn encode_raw(payload: &str) -> String {
    format!("{HEADER_MARK}{}{HEADER_MARK}{payload}", payload.len())
}

/// Split one WebSocket text message into its frames.
///
/// Fails with [`TvError::Parse`] on a missing or non-numeric header, or when a
/// declared length does not match the bytes that follow it.
pub fn decode(packet: &str) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    let mut rest = packet;

    while !rest.is_empty() {
        let after_mark = rest.strip_prefix(HEADER_MARK).ok_or_else(|| {
            TvError::Parse(format!("frame header missing at {:?}", preview(rest)))
        })?;
        let (len_str, body) = after_mark
            .split_once(HEADER_MARK)
            .ok_or_else(|| TvError::Parse("unterminated frame header".into()))?;
        let len: usize = len_str
            .parse()
            .map_err(|_| TvError::Parse(format!("invalid frame length {len_str:?}")))?;

        let payload = body.get(..len).ok_or_else(|| {
            TvError::Parse(format!(
                "declared frame length {len} does not fit the {} bytes that follow",
                body.len()
            ))
        })?;

        frames.push(Frame::classify(payload));
        rest = &body[len..];
    }

    Ok(frames)
}

/// The first message name in raw text, for packets the decoder rejects.
pub fn extract_message_name(raw: &str) -> Option<String> {
    MESSAGE_NAME_RE.captures(raw).map(|c| c[1].to_owned())
}

/// Pull the first message name and parameter list out of raw accumulated text.
///
/// The payload is best-effort: it ends at the first `]}`, so a parameter list
/// holding nested arrays of objects comes back truncated. Use [`decode`] when
/// the parameters matter.
///
/// Returns `None` (logged) when either pattern is absent, which callers treat
/// as "nothing usable in this chunk" rather than a protocol failure.
pub fn extract_message_and_payload(raw: &str) -> Option<(String, String)> {
    let name = extract_message_name(raw);
    let payload = MESSAGE_PAYLOAD_RE.captures(raw).map(|c| c[1].to_owned());

    match (name, payload) {
        (Some(name), Some(payload)) => Some((name, payload)),
        _ => {
            tracing::error!("no message name/payload in raw text: {:?}", preview(raw));
            None
        }
    }
}

fn preview(s: &str) -> &str {
    let end = s
        .char_indices()
        .nth(64)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}
