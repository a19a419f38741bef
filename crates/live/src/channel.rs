use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::event::{Envelope, LiveEvent};

/// Connection status of the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Reconnect policy after an unexpected disconnect: a fixed number of
/// attempts with a fixed delay between them, over the channel's lifetime.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub reconnect_attempts: u32,
    pub reconnect_delay: Duration,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            reconnect_attempts: 5,
            reconnect_delay: Duration::from_secs(1),
        }
    }
}

/// Derive the push endpoint from the HTTP base URL. The operator identity
/// rides in the query string.
pub fn live_url(base_url: &str, operator_id: &str) -> String {
    let ws_base = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base_url.to_string()
    };
    format!(
        "{}/live?userId={}",
        ws_base.trim_end_matches('/'),
        urlencoding::encode(operator_id)
    )
}

/// Persistent push connection keyed by operator identity.
///
/// Decoded [`LiveEvent`]s arrive on the receiver returned by
/// [`take_events`](Self::take_events); connection state is observable via a
/// `watch` channel. Dropping the handle tears the connection down; a manual
/// [`disconnect`](Self::disconnect) does so without any retry.
pub struct LiveChannel {
    status_rx: watch::Receiver<ChannelStatus>,
    events: Option<mpsc::UnboundedReceiver<LiveEvent>>,
    outbound: mpsc::UnboundedSender<Envelope>,
    shutdown: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl LiveChannel {
    pub fn connect(base_url: &str, operator_id: &str) -> Self {
        Self::connect_with(base_url, operator_id, LiveConfig::default())
    }

    pub fn connect_with(base_url: &str, operator_id: &str, config: LiveConfig) -> Self {
        let url = live_url(base_url, operator_id);
        let (status_tx, status_rx) = watch::channel(ChannelStatus::Disconnected);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(drive(
            url,
            config,
            status_tx,
            event_tx,
            outbound_rx,
            shutdown_rx,
        ));
        Self {
            status_rx,
            events: Some(event_rx),
            outbound: outbound_tx,
            shutdown: shutdown_tx,
            task,
        }
    }

    pub fn status(&self) -> ChannelStatus {
        *self.status_rx.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ChannelStatus> {
        self.status_rx.clone()
    }

    /// Take the event receiver (can only be taken once).
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<LiveEvent>> {
        self.events.take()
    }

    /// Queue a named message for the server. Returns `false` — and drops the
    /// message — when the channel is not connected.
    pub fn emit(&self, event: &str, data: serde_json::Value) -> bool {
        if self.status() != ChannelStatus::Connected {
            warn!("live channel not connected, dropping outbound {event}");
            return false;
        }
        self.outbound
            .send(Envelope {
                event: event.to_string(),
                data,
            })
            .is_ok()
    }

    /// Manual disconnect: closes the socket and never retries.
    pub async fn disconnect(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

async fn drive(
    url: String,
    config: LiveConfig,
    status: watch::Sender<ChannelStatus>,
    events: mpsc::UnboundedSender<LiveEvent>,
    mut outbound: mpsc::UnboundedReceiver<Envelope>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut attempts_left = config.reconnect_attempts;
    loop {
        if *shutdown.borrow() {
            break;
        }
        let _ = status.send(ChannelStatus::Connecting);
        let connected = tokio::select! {
            conn = connect_async(url.as_str()) => conn,
            _ = shutdown.changed() => break,
        };
        match connected {
            Ok((ws, _)) => {
                debug!("live channel connected to {url}");
                let _ = status.send(ChannelStatus::Connected);
                let manual = run_connection(ws, &events, &mut outbound, &mut shutdown).await;
                let _ = status.send(ChannelStatus::Disconnected);
                if manual {
                    return;
                }
            }
            Err(err) => {
                warn!("live channel connect failed: {err}");
                let _ = status.send(ChannelStatus::Disconnected);
            }
        }
        if attempts_left == 0 {
            warn!(
                "live channel giving up after {} reconnect attempts",
                config.reconnect_attempts
            );
            break;
        }
        attempts_left -= 1;
        tokio::select! {
            _ = tokio::time::sleep(config.reconnect_delay) => {}
            _ = shutdown.changed() => break,
        }
    }
    let _ = status.send(ChannelStatus::Disconnected);
}

/// Pump one established connection. Returns `true` on manual shutdown,
/// `false` on an unexpected disconnect.
async fn run_connection<S>(
    ws: tokio_tungstenite::WebSocketStream<S>,
    events: &mpsc::UnboundedSender<LiveEvent>,
    outbound: &mut mpsc::UnboundedReceiver<Envelope>,
    shutdown: &mut watch::Receiver<bool>,
) -> bool
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut write, mut read) = ws.split();
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = write.close().await;
                return true;
            }
            Some(envelope) = outbound.recv() => {
                match serde_json::to_string(&envelope) {
                    Ok(raw) => {
                        if write.send(Message::Text(raw)).await.is_err() {
                            return false;
                        }
                    }
                    Err(err) => warn!("could not encode outbound {}: {err}", envelope.event),
                }
            }
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(raw))) => match LiveEvent::decode(&raw) {
                        // A closed receiver just means nobody is listening;
                        // the connection stays up for outbound traffic.
                        Some(event) => {
                            let _ = events.send(event);
                        }
                        None => warn!("dropping undecodable live frame"),
                    },
                    Some(Ok(Message::Close(_))) | None => return false,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("live channel error: {err}");
                        return false;
                    }
                }
            }
        }
    }
}
