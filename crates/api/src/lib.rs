//! Shared API types for the rewarddesk admin console.
//!
//! This crate is the **single source of truth** for all request/response
//! shapes exchanged with the platform backend. The resource clients, the
//! query layer, and the CLI all consume these types; nothing else in the
//! workspace defines wire structs.
//!
//! Field names follow the backend's JSON conventions (`_id`, camelCase),
//! while the Rust side stays snake_case via serde renames.

use serde::{Deserialize, Serialize};

pub mod keys;

pub use keys::CacheKey;

// ─── Shared Enums ────────────────────────────────────────────────────────────

/// Role attached to an authenticated operator identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Social platform a task is performed on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Twitter,
    Youtube,
    Instagram,
    Telegram,
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Twitter => "twitter",
            Self::Youtube => "youtube",
            Self::Instagram => "instagram",
            Self::Telegram => "telegram",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How completion of a task is verified by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    Api,
    Manual,
    Screenshot,
    Oauth,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Api => "api",
            Self::Manual => "manual",
            Self::Screenshot => "screenshot",
            Self::Oauth => "oauth",
        }
    }
}

impl std::fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a token-sale batch. Not every backend schema variant
/// carries this field, so it is optional on [`Batch`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Active,
    Completed,
    Pending,
}

impl BatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Auth ────────────────────────────────────────────────────────────────────

/// Email + password credential exchange, `POST /admin-auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Operator identity issued alongside the session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Returned on successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Platform member as stored server-side. `id` is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub referral_code: String,
    pub tokens: u64,
    pub shares: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Request body for `POST /admin/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    pub tokens: u64,
    pub shares: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Partial update for `PUT /admin/users/{id}` — only provided fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

/// Reward task. The wire field for the label is `task` — a relic of the
/// backend's original minimal schema that the extended schema kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "task")]
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub reward: u64,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    pub verification_method: VerificationMethod,
}

/// Request body for `POST /admin/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(rename = "task")]
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub reward: u64,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    pub verification_method: VerificationMethod,
}

/// Partial update for `PUT /admin/tasks/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(rename = "task", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<VerificationMethod>,
}

// ─── Leaderboard ─────────────────────────────────────────────────────────────

/// Embedded user snippet on a leaderboard entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub name: String,
    pub email: String,
}

/// Ranked leaderboard row. `position` is derived server-side from the
/// coins/shares ranking and is never written by the client. `user` is `None`
/// when the referenced platform member has since been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub position: u32,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
    pub coins: u64,
    pub shares: u64,
}

/// Request body for `POST /admin/leaderboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaderboardEntry {
    pub user_id: String,
    pub coins: u64,
    pub shares: u64,
}

/// `POST /admin/leaderboard` answers a structurally successful 2xx even when
/// the entry was rejected on business grounds (score below the qualification
/// threshold). The rejection arrives as a bare `{message}` body in place of
/// the created entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LeaderboardCreateResponse {
    Rejected(ErrorBody),
    Created(LeaderboardEntry),
}

// ─── Batches ─────────────────────────────────────────────────────────────────

/// Token-sale batch. `tokens_sold <= total_tokens` is a server-side concern
/// and is deliberately not checked here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[serde(rename = "_id")]
    pub id: String,
    pub batch_number: u32,
    pub current_price: f64,
    pub next_price: f64,
    pub tokens_sold: u64,
    pub total_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BatchStatus>,
}

/// Request body for `POST /admin/batches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBatch {
    pub batch_number: u32,
    pub current_price: f64,
    pub next_price: f64,
    pub tokens_sold: u64,
    pub total_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BatchStatus>,
}

/// Partial update for `PUT /admin/batches/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_sold: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BatchStatus>,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// JSON error body `{ "message": "..." }` returned by the backend on failures
/// and on leaderboard domain rejections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
}

/// Normalized failure handed to every caller of the data layer.
///
/// `status` is present for HTTP error responses and absent for transport
/// failures and domain rejections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_label_keeps_legacy_wire_name() {
        let new = NewTask {
            label: "follow us".into(),
            description: String::new(),
            reward: 5,
            platform: Platform::Twitter,
            platform_id: None,
            verification_method: VerificationMethod::Api,
        };
        let json = serde_json::to_value(&new).expect("serialize task");
        assert_eq!(json["task"], "follow us");
        assert_eq!(json["platform"], "twitter");
        assert_eq!(json["verificationMethod"], "api");
        assert!(json.get("label").is_none());
        assert!(json.get("platformId").is_none());
    }

    #[test]
    fn leaderboard_entry_tolerates_deleted_user() {
        let raw = r#"{"_id":"e1","position":3,"userId":null,"coins":120,"shares":4}"#;
        let entry: LeaderboardEntry = serde_json::from_str(raw).expect("parse entry");
        assert_eq!(entry.user, None);
        assert_eq!(entry.position, 3);
    }

    #[test]
    fn leaderboard_create_response_separates_rejection_from_entry() {
        let rejected: LeaderboardCreateResponse =
            serde_json::from_str(r#"{"message":"score below threshold"}"#).expect("parse");
        assert!(matches!(
            rejected,
            LeaderboardCreateResponse::Rejected(ErrorBody { ref message }) if message == "score below threshold"
        ));

        let created: LeaderboardCreateResponse = serde_json::from_str(
            r#"{"_id":"e2","position":1,"userId":{"name":"ada","email":"ada@example.com"},"coins":900,"shares":12}"#,
        )
        .expect("parse");
        assert!(matches!(created, LeaderboardCreateResponse::Created(_)));
    }

    #[test]
    fn batch_status_is_optional_across_schema_variants() {
        let raw = r#"{"_id":"b1","batchNumber":2,"currentPrice":0.05,"nextPrice":0.06,"tokensSold":100,"totalTokens":1000}"#;
        let batch: Batch = serde_json::from_str(raw).expect("parse batch");
        assert_eq!(batch.status, None);

        let raw = r#"{"_id":"b2","batchNumber":3,"currentPrice":0.06,"nextPrice":0.07,"tokensSold":0,"totalTokens":500,"status":"pending"}"#;
        let batch: Batch = serde_json::from_str(raw).expect("parse batch");
        assert_eq!(batch.status, Some(BatchStatus::Pending));
    }

    #[test]
    fn platform_is_a_closed_set() {
        assert!(serde_json::from_str::<Platform>(r#""tiktok""#).is_err());
    }

    #[test]
    fn partial_update_serializes_only_provided_fields() {
        let update = UserUpdate {
            tokens: Some(10),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).expect("serialize update");
        assert_eq!(json, serde_json::json!({"tokens": 10}));
    }
}
