use anyhow::{Context, Result};

use rewarddesk_live::{LiveChannel, LiveEvent};

use crate::context::AppContext;

/// Follow the push channel for the logged-in operator, invalidating cache
/// keys on collection-change hints and printing everything else.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let identity = ctx.require_identity()?;
    let mut channel = LiveChannel::connect(ctx.gateway.base_url(), &identity.email);
    let mut events = channel
        .take_events()
        .context("event stream already taken")?;

    println!("watching live events for {} (ctrl-c to stop)", identity.email);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Some(event) => {
                    if let Some(key) = event.invalidates() {
                        ctx.cache.invalidate(&key);
                    }
                    match event {
                        LiveEvent::Notification(data) => println!("notification: {data}"),
                        LiveEvent::LeaderboardUpdate(update) => {
                            let payload = serde_json::Value::Object(update.payload);
                            println!("leaderboard {}: {payload}", update.kind);
                        }
                        LiveEvent::Custom { event, data } => println!("{event}: {data}"),
                    }
                }
                None => {
                    println!("live channel closed");
                    break;
                }
            }
        }
    }
    channel.disconnect().await;
    Ok(())
}
