use serde::{Deserialize, Serialize};
use serde_json::Value;

use rewarddesk_api::CacheKey;

pub const NOTIFICATION_EVENT: &str = "notification";
pub const LEADERBOARD_UPDATE_EVENT: &str = "leaderboard_update";

/// Wire envelope for every push frame: `{"event": "...", "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// Payload tag on a `leaderboard_update` message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    StatsUpdate,
    VisibilityChange,
}

impl UpdateKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::StatsUpdate => "stats_update",
            Self::VisibilityChange => "visibility_change",
        }
    }
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `leaderboard_update` message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardUpdate {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
}

/// One decoded push message.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// Opaque display payload for the operator.
    Notification(Value),
    /// The leaderboard collection changed server-side.
    LeaderboardUpdate(LeaderboardUpdate),
    /// Any other named message, passed through for extensibility.
    Custom { event: String, data: Value },
}

impl LiveEvent {
    /// Decode a raw text frame. `None` for frames that are not a well-formed
    /// envelope.
    pub fn decode(raw: &str) -> Option<Self> {
        let envelope: Envelope = serde_json::from_str(raw).ok()?;
        Some(Self::from_envelope(envelope))
    }

    pub fn from_envelope(envelope: Envelope) -> Self {
        match envelope.event.as_str() {
            NOTIFICATION_EVENT => Self::Notification(envelope.data),
            LEADERBOARD_UPDATE_EVENT => {
                match serde_json::from_value(envelope.data.clone()) {
                    Ok(update) => Self::LeaderboardUpdate(update),
                    // Untagged or unknown-tagged payloads stay opaque.
                    Err(_) => Self::Custom {
                        event: envelope.event,
                        data: envelope.data,
                    },
                }
            }
            _ => Self::Custom {
                event: envelope.event,
                data: envelope.data,
            },
        }
    }

    /// Cache key this message suggests invalidating, if any.
    pub fn invalidates(&self) -> Option<CacheKey> {
        match self {
            Self::LeaderboardUpdate(_) => Some(CacheKey::Leaderboard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn notification_frames_decode_to_opaque_payloads() {
        let event =
            LiveEvent::decode(r#"{"event":"notification","data":{"text":"hi"}}"#).expect("decode");
        assert_eq!(event, LiveEvent::Notification(json!({"text": "hi"})));
        assert_eq!(event.invalidates(), None);
    }

    #[test]
    fn leaderboard_updates_carry_their_tag_and_hint_invalidation() {
        let event = LiveEvent::decode(
            r#"{"event":"leaderboard_update","data":{"type":"stats_update","coins":5}}"#,
        )
        .expect("decode");
        match &event {
            LiveEvent::LeaderboardUpdate(update) => {
                assert_eq!(update.kind, UpdateKind::StatsUpdate);
                assert_eq!(update.payload.get("coins"), Some(&json!(5)));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(event.invalidates(), Some(CacheKey::Leaderboard));
    }

    #[test]
    fn unknown_event_names_pass_through_as_custom() {
        let event =
            LiveEvent::decode(r#"{"event":"price_tick","data":[1,2]}"#).expect("decode");
        assert_eq!(
            event,
            LiveEvent::Custom {
                event: "price_tick".into(),
                data: json!([1, 2]),
            }
        );
    }

    #[test]
    fn leaderboard_update_with_unknown_tag_stays_opaque() {
        let event = LiveEvent::decode(
            r#"{"event":"leaderboard_update","data":{"type":"season_reset"}}"#,
        )
        .expect("decode");
        assert!(matches!(event, LiveEvent::Custom { .. }));
    }

    #[test]
    fn malformed_frames_are_dropped() {
        assert_eq!(LiveEvent::decode("not json"), None);
        assert_eq!(LiveEvent::decode(r#"{"data":1}"#), None);
    }
}
