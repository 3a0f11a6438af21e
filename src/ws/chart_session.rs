//! The chart handshake and streaming loop for one historical fetch.
//!
//! Before any bars flow, the server expects nine setup messages in a fixed
//! order:
//!
//! | # | Message | Enters |
//! |---|---|---|
//! | 1 | `set_auth_token` | `Authenticated` |
//! | 2 | `chart_create_session` | `SessionsCreated` |
//! | 3 | `quote_create_session` | `SessionsCreated` |
//! | 4 | `quote_set_fields` | `FieldsSet` |
//! | 5 | `quote_add_symbols` | `SymbolAdded` |
//! | 6 | `quote_fast_symbols` | `SymbolAdded` |
//! | 7 | `resolve_symbol` | `SymbolResolved` |
//! | 8 | `create_series` | `SeriesRequested` |
//! | 9 | `switch_timezone` | `SeriesRequested` |
//!
//! After the last one the session is `Streaming`: every received message is
//! appended to a text accumulator until `series_completed` shows up. A failed
//! receive also ends the stream, and whatever was accumulated is still handed
//! to the bar parser.

use serde::Serialize;
use serde_json::{Value, json};
use tokio::time::Instant;

use crate::constants::{
    QUOTE_FIELDS, SERIES_ALIAS, SERIES_COMPLETED, SYMBOL_ALIAS, TERMINAL_ERRORS,
};
use crate::error::{Result, TvError};
use crate::session::SessionIds;
use crate::types::enums::SessionMode;
use crate::types::historical::HistoricalRequest;
use crate::ws::codec::{self, Frame, ProtocolMessage};
use crate::ws::connection::Transport;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Handshake progress. States only ever advance, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionState {
    Disconnected,
    Connected,
    Authenticated,
    SessionsCreated,
    FieldsSet,
    SymbolAdded,
    SymbolResolved,
    SeriesRequested,
    Streaming,
    Completed,
}

impl SessionState {
    /// The state that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        use SessionState::*;
        match self {
            Disconnected => Some(Connected),
            Connected => Some(Authenticated),
            Authenticated => Some(SessionsCreated),
            SessionsCreated => Some(FieldsSet),
            FieldsSet => Some(SymbolAdded),
            SymbolAdded => Some(SymbolResolved),
            SymbolResolved => Some(SeriesRequested),
            SeriesRequested => Some(Streaming),
            Streaming => Some(Completed),
            Completed => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Setup messages
// ---------------------------------------------------------------------------

/// One setup message together with the state it moves the session into.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupStep {
    pub enters: SessionState,
    pub message: ProtocolMessage,
}

impl SetupStep {
    fn new(enters: SessionState, name: &str, params: Vec<Value>) -> Self {
        Self {
            enters,
            message: ProtocolMessage::new(name, params),
        }
    }
}

#[derive(Serialize)]
struct SymbolDescriptor<'a> {
    symbol: &'a str,
    adjustment: &'a str,
    session: SessionMode,
}

/// The nine setup messages for `request`, in send order.
pub fn setup_steps(
    token: &str,
    ids: &SessionIds,
    request: &HistoricalRequest,
) -> Result<Vec<SetupStep>> {
    use SessionState::*;

    let symbol = request.formatted_symbol();
    let qs = ids.quote.as_str();
    let cs = ids.chart.as_str();

    let mut fields = Vec::with_capacity(QUOTE_FIELDS.len() + 1);
    fields.push(json!(qs));
    fields.extend(QUOTE_FIELDS.iter().map(|f| json!(f)));

    // resolve_symbol takes the descriptor as a string prefixed with '='.
    let descriptor = format!(
        "={}",
        serde_json::to_string(&SymbolDescriptor {
            symbol: &symbol,
            adjustment: "splits",
            session: request.session_mode(),
        })?
    );

    Ok(vec![
        SetupStep::new(Authenticated, "set_auth_token", vec![json!(token)]),
        SetupStep::new(SessionsCreated, "chart_create_session", vec![json!(cs), json!("")]),
        SetupStep::new(SessionsCreated, "quote_create_session", vec![json!(qs)]),
        SetupStep::new(FieldsSet, "quote_set_fields", fields),
        SetupStep::new(
            SymbolAdded,
            "quote_add_symbols",
            vec![json!(qs), json!(symbol), json!({ "flags": ["force_permission"] })],
        ),
        SetupStep::new(SymbolAdded, "quote_fast_symbols", vec![json!(qs), json!(symbol)]),
        SetupStep::new(
            SymbolResolved,
            "resolve_symbol",
            vec![json!(cs), json!(SYMBOL_ALIAS), json!(descriptor)],
        ),
        SetupStep::new(
            SeriesRequested,
            "create_series",
            vec![
                json!(cs),
                json!(SERIES_ALIAS),
                json!(SERIES_ALIAS),
                json!(SYMBOL_ALIAS),
                json!(request.interval.as_str()),
                json!(request.n_bars),
            ],
        ),
        SetupStep::new(SeriesRequested, "switch_timezone", vec![json!(cs), json!("exchange")]),
    ])
}

// ---------------------------------------------------------------------------
// Stream outcome
// ---------------------------------------------------------------------------

/// Why the streaming phase stopped.
#[derive(Debug)]
pub enum StreamEnd {
    /// `series_completed` was received.
    Completed,
    /// A receive (or heartbeat echo) failed; the data is possibly truncated.
    Interrupted(TvError),
    /// The server reported an error message such as `symbol_error`.
    ServerError(String),
    /// The configured fetch budget ran out.
    DeadlineElapsed,
}

/// Raw text accumulated during streaming plus the reason it stopped.
#[derive(Debug)]
pub struct StreamOutput {
    /// Every received message, each followed by `\n`.
    pub raw: String,
    pub end: StreamEnd,
}

impl StreamOutput {
    /// `true` only when the server signalled the end of the series.
    pub fn is_complete(&self) -> bool {
        matches!(self.end, StreamEnd::Completed)
    }
}

// ---------------------------------------------------------------------------
// Chart session
// ---------------------------------------------------------------------------

/// Drives one fetch over an already-connected [`Transport`].
pub struct ChartSession<T> {
    transport: T,
    state: SessionState,
    history: Vec<SessionState>,
    sent: usize,
}

impl<T: Transport> ChartSession<T> {
    /// Wrap an open transport, recording the move from `Disconnected` to
    /// `Connected`.
    pub fn new(transport: T) -> Self {
        let mut session = Self {
            transport,
            state: SessionState::Disconnected,
            history: vec![SessionState::Disconnected],
            sent: 0,
        };
        session.advance(SessionState::Connected);
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every distinct state entered so far, oldest first.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    /// Number of setup messages sent so far.
    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Handshake then stream.
    pub async fn run(
        &mut self,
        token: &str,
        ids: &SessionIds,
        request: &HistoricalRequest,
        deadline: Option<Instant>,
    ) -> Result<StreamOutput> {
        self.handshake(token, ids, request).await?;
        self.stream(deadline).await
    }

    /// Send the nine setup messages. Any send failure aborts the fetch.
    pub async fn handshake(
        &mut self,
        token: &str,
        ids: &SessionIds,
        request: &HistoricalRequest,
    ) -> Result<()> {
        for step in setup_steps(token, ids, request)? {
            self.enter(step.enters)?;
            self.transport.send(&step.message).await?;
            self.sent += 1;
            tracing::debug!(msg = %step.message.name, state = ?self.state, "setup message sent");
        }
        Ok(())
    }

    /// Read until `series_completed`, a receive failure, a server error, or
    /// the deadline. Interruptions are reported in [`StreamEnd`]; the only
    /// error is calling this before the handshake has finished.
    pub async fn stream(&mut self, deadline: Option<Instant>) -> Result<StreamOutput> {
        self.enter(SessionState::Streaming)?;

        let mut raw = String::new();
        let end = loop {
            let received = match deadline {
                Some(at) => match tokio::time::timeout_at(at, self.transport.receive()).await {
                    Ok(r) => r,
                    Err(_) => {
                        tracing::error!("fetch deadline elapsed before series completed");
                        break StreamEnd::DeadlineElapsed;
                    }
                },
                None => self.transport.receive().await,
            };

            let text = match received {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("receive failed, parsing what was received: {e}");
                    break StreamEnd::Interrupted(e);
                }
            };

            raw.push_str(&text);
            raw.push('\n');

            if let Some(end) = self.inspect(&text).await {
                break end;
            }
            if text.contains(SERIES_COMPLETED) {
                break StreamEnd::Completed;
            }
        };

        self.enter(SessionState::Completed)?;
        Ok(StreamOutput { raw, end })
    }

    /// Echo heartbeats and watch for server-side errors in one packet.
    async fn inspect(&mut self, text: &str) -> Option<StreamEnd> {
        let frames = match codec::decode(text) {
            Ok(frames) => frames,
            Err(e) => {
                tracing::debug!("undecodable packet: {e}");
                let name = codec::extract_message_name(text)?;
                return is_terminal(&name).then_some(StreamEnd::ServerError(name));
            }
        };

        for frame in frames {
            match frame {
                Frame::Heartbeat(beat) => {
                    tracing::trace!(%beat, "heartbeat");
                    if let Err(e) = self.transport.send_raw(&beat).await {
                        tracing::error!("heartbeat echo failed: {e}");
                        return Some(StreamEnd::Interrupted(e));
                    }
                }
                Frame::Message(msg) => {
                    tracing::debug!(msg = %msg.name, "received");
                    if is_terminal(&msg.name) {
                        tracing::error!(
                            msg = %msg.name,
                            params = ?msg.params,
                            "server rejected request"
                        );
                        return Some(StreamEnd::ServerError(msg.name));
                    }
                }
                Frame::Other(_) => {}
            }
        }
        None
    }

    fn enter(&mut self, target: SessionState) -> Result<()> {
        if target == self.state && self.state != SessionState::Streaming {
            return Ok(());
        }
        if self.state.next() != Some(target) {
            return Err(TvError::InvalidArgument(format!(
                "illegal session transition {:?} -> {:?}",
                self.state, target
            )));
        }
        self.advance(target);
        Ok(())
    }

    fn advance(&mut self, target: SessionState) {
        tracing::trace!(from = ?self.state, to = ?target, "session state");
        self.state = target;
        self.history.push(target);
    }
}

fn is_terminal(name: &str) -> bool {
    TERMINAL_ERRORS.contains(&name)
}
