//! Cache-key vocabulary shared by the resource clients and the query layer.
//!
//! Declaring the keys next to the wire types (rather than as ad-hoc strings
//! inside the cache) keeps the mutation→invalidation mapping statically
//! visible: each resource client names the exact keys its mutations touch.

use std::fmt;

/// Identifier for one cached collection or single entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Users,
    User(String),
    Tasks,
    Task(String),
    Leaderboard,
    LeaderboardEntry(String),
    Batches,
    Batch(String),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Users => write!(f, "users"),
            Self::User(id) => write!(f, "users/{id}"),
            Self::Tasks => write!(f, "tasks"),
            Self::Task(id) => write!(f, "tasks/{id}"),
            Self::Leaderboard => write!(f, "leaderboard"),
            Self::LeaderboardEntry(id) => write!(f, "leaderboard/{id}"),
            Self::Batches => write!(f, "batches"),
            Self::Batch(id) => write!(f, "batches/{id}"),
        }
    }
}
