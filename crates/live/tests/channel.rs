//! Push channel against loopback websocket servers: delivery, emit,
//! bounded reconnect, manual disconnect.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use rewarddesk_api::CacheKey;
use rewarddesk_live::{ChannelStatus, LiveChannel, LiveConfig, LiveEvent, UpdateKind};

const WAIT: Duration = Duration::from_secs(5);

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    (listener, base)
}

async fn wait_for(channel: &LiveChannel, wanted: ChannelStatus) {
    let mut status = channel.subscribe_status();
    timeout(WAIT, async {
        while *status.borrow() != wanted {
            status.changed().await.expect("status sender alive");
        }
    })
    .await
    .expect("status reached in time");
}

#[tokio::test]
async fn delivers_decoded_events_in_order() {
    let (listener, base) = bind().await;
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = accept_async(stream).await.expect("handshake");
        for frame in [
            json!({"event": "notification", "data": {"text": "hi"}}),
            json!({"event": "leaderboard_update", "data": {"type": "stats_update", "coins": 5}}),
            json!({"event": "price_tick", "data": 42}),
        ] {
            ws.send(Message::Text(frame.to_string()))
                .await
                .expect("send");
        }
        // Hold the connection open until the client closes it.
        while let Some(frame) = ws.next().await {
            if frame.is_err() {
                break;
            }
        }
    });

    let mut channel = LiveChannel::connect(&base, "op-1");
    let mut events = channel.take_events().expect("events");

    let first = timeout(WAIT, events.recv()).await.expect("recv").expect("event");
    assert_eq!(first, LiveEvent::Notification(json!({"text": "hi"})));

    let second = timeout(WAIT, events.recv()).await.expect("recv").expect("event");
    match &second {
        LiveEvent::LeaderboardUpdate(update) => assert_eq!(update.kind, UpdateKind::StatsUpdate),
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(second.invalidates(), Some(CacheKey::Leaderboard));

    let third = timeout(WAIT, events.recv()).await.expect("recv").expect("event");
    assert!(matches!(third, LiveEvent::Custom { ref event, .. } if event == "price_tick"));

    channel.disconnect().await;
}

#[tokio::test]
async fn emit_reaches_the_server_while_connected() {
    let (listener, base) = bind().await;
    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = accept_async(stream).await.expect("handshake");
        while let Some(Ok(frame)) = ws.next().await {
            if let Message::Text(raw) = frame {
                let _ = seen_tx.send(raw);
            }
        }
    });

    let channel = LiveChannel::connect(&base, "op-1");
    wait_for(&channel, ChannelStatus::Connected).await;

    assert!(channel.emit("mark_seen", json!({"id": "n1"})));
    let raw = timeout(WAIT, seen_rx.recv()).await.expect("recv").expect("frame");
    let envelope: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(envelope["event"], "mark_seen");
    assert_eq!(envelope["data"]["id"], "n1");

    channel.disconnect().await;
}

#[tokio::test]
async fn retries_a_bounded_number_of_times_after_unexpected_drops() {
    let (listener, base) = bind().await;
    let accepts = Arc::new(AtomicUsize::new(0));
    {
        let accepts = accepts.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = listener.accept().await.expect("accept");
                accepts.fetch_add(1, Ordering::SeqCst);
                // Hang up straight away: an unexpected disconnect every time.
                let mut ws = accept_async(stream).await.expect("handshake");
                let _ = ws.close(None).await;
            }
        });
    }

    let channel = LiveChannel::connect_with(
        &base,
        "op-1",
        LiveConfig {
            reconnect_attempts: 2,
            reconnect_delay: Duration::from_millis(50),
        },
    );

    timeout(WAIT, async {
        while accepts.load(Ordering::SeqCst) < 3 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("initial attempt plus two retries");

    // The budget is spent: no further attempts, channel stays down.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(accepts.load(Ordering::SeqCst), 3);
    assert_eq!(channel.status(), ChannelStatus::Disconnected);
    assert!(!channel.emit("ping", json!(null)));
}

#[tokio::test]
async fn manual_disconnect_does_not_retry() {
    let (listener, base) = bind().await;
    let accepts = Arc::new(AtomicUsize::new(0));
    {
        let accepts = accepts.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = listener.accept().await.expect("accept");
                accepts.fetch_add(1, Ordering::SeqCst);
                let mut ws = accept_async(stream).await.expect("handshake");
                while let Some(frame) = ws.next().await {
                    if frame.is_err() {
                        break;
                    }
                }
            }
        });
    }

    let channel = LiveChannel::connect(&base, "op-1");
    wait_for(&channel, ChannelStatus::Connected).await;
    channel.disconnect().await;

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(accepts.load(Ordering::SeqCst), 1);
}
