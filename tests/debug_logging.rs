//! The `debug` flag promotes outbound frames to `info`-level logs.

use std::io;
use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tvfeed_rs::config::ClientConfig;
use tvfeed_rs::ws::codec::ProtocolMessage;
use tvfeed_rs::ws::connection::{ProtocolConnection, Transport};

/// `io::Write` into a shared buffer, one clone per log event.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Accept one WebSocket and read until the client closes it.
async fn sink_server() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                break;
            }
        }
    });
    (url, handle)
}

/// Send one `set_auth_token` frame with `debug` set as given, returning the
/// `info`-level log output.
async fn send_with_debug(debug: bool) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (url, server) = sink_server().await;
    let config = ClientConfig {
        ws_url: url,
        debug,
        ..ClientConfig::default()
    };

    let mut conn = ProtocolConnection::open(&config).await.unwrap();
    conn.send(&ProtocolMessage::new("set_auth_token", vec![json!("abc")]))
        .await
        .unwrap();
    conn.close().await;
    server.await.unwrap();

    captured.text()
}

#[tokio::test]
async fn debug_flag_logs_outbound_frames_at_info() {
    let logs = send_with_debug(true).await;
    let line = logs
        .lines()
        .find(|l| l.contains("ws send"))
        .unwrap_or_else(|| panic!("no outbound frame logged:\n{logs}"));
    assert!(line.contains("INFO"), "{line}");
    assert!(line.contains(r#"~m~34~m~{"m":"set_auth_token","p":["abc"]}"#), "{line}");
}

#[tokio::test]
async fn outbound_frames_stay_below_info_without_debug() {
    let logs = send_with_debug(false).await;
    assert!(logs.contains("Connected to chart WebSocket"), "{logs}");
    assert!(!logs.contains("ws send"), "{logs}");
    assert!(!logs.contains("set_auth_token"), "{logs}");
}
