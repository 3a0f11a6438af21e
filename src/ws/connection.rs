//! The single WebSocket connection behind one historical fetch.
//!
//! [`ProtocolConnection`] connects with the `Origin` header the service
//! requires, writes framed [`ProtocolMessage`]s, and reads text messages with a
//! per-read timeout. The [`Transport`] trait is the seam the chart session is
//! written against, so a scripted transport can stand in for the socket.

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::config::ClientConfig;
use crate::error::{Result, TvError};
use crate::ws::codec::{self, ProtocolMessage};

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Frame-level send/receive used by [`ChartSession`](crate::ws::chart_session::ChartSession).
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Encode `message` into a frame and send it.
    async fn send(&mut self, message: &ProtocolMessage) -> Result<()>;

    /// Frame and send a raw payload (used to echo heartbeats).
    async fn send_raw(&mut self, payload: &str) -> Result<()>;

    /// Wait for the next text message from the server.
    async fn receive(&mut self) -> Result<String>;
}

// ---------------------------------------------------------------------------
// WebSocket connection
// ---------------------------------------------------------------------------

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open chart data WebSocket.
pub struct ProtocolConnection {
    read: SplitStream<WsStream>,
    write: SplitSink<WsStream, Message>,
    read_timeout: Duration,
    debug: bool,
}

impl ProtocolConnection {
    /// Connect to `config.ws_url`, bounded by `config.connect_timeout`.
    pub async fn open(config: &ClientConfig) -> Result<Self> {
        tracing::debug!(url = %config.ws_url, "creating websocket connection");

        let mut request = config.ws_url.as_str().into_client_request()?;
        let origin = HeaderValue::from_str(&config.ws_origin).map_err(|_| {
            TvError::InvalidArgument("origin contains invalid header characters".into())
        })?;
        request.headers_mut().insert(ORIGIN, origin);

        let (ws, _resp) = tokio::time::timeout(config.connect_timeout, connect_async(request))
            .await
            .map_err(|_| TvError::Timeout(config.connect_timeout))??;

        let (write, read) = ws.split();
        tracing::info!(url = %config.ws_url, "Connected to chart WebSocket");

        Ok(Self {
            read,
            write,
            read_timeout: config.read_timeout,
            debug: config.debug,
        })
    }

    /// Send a close frame. Errors are logged only; the fetch is already done.
    pub async fn close(mut self) {
        if let Err(e) = self.write.send(Message::Close(None)).await {
            tracing::debug!("close frame not delivered: {e}");
        }
    }

    async fn write_frame(&mut self, frame: String) -> Result<()> {
        if self.debug {
            tracing::info!(%frame, "ws send");
        } else {
            tracing::trace!(%frame, "ws send");
        }
        self.write.send(Message::Text(frame.into())).await?;
        Ok(())
    }
}

impl Transport for ProtocolConnection {
    async fn send(&mut self, message: &ProtocolMessage) -> Result<()> {
        let frame = codec::encode(message)?;
        self.write_frame(frame).await
    }

    async fn send_raw(&mut self, payload: &str) -> Result<()> {
        self.write_frame(codec::encode_raw(payload)).await
    }

    async fn receive(&mut self) -> Result<String> {
        loop {
            let next = tokio::time::timeout(self.read_timeout, self.read.next())
                .await
                .map_err(|_| TvError::Timeout(self.read_timeout))?;

            match next {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
                Some(Ok(Message::Binary(data))) => {
                    return Ok(String::from_utf8_lossy(&data).into_owned());
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Chart WebSocket closed by server");
                    return Err(TvError::WebSocket(tungstenite::Error::ConnectionClosed));
                }
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }
}
