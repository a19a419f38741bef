use std::sync::Arc;

use rewarddesk_api::{
    ApiError, CacheKey, LeaderboardCreateResponse, LeaderboardEntry, NewLeaderboardEntry,
};

use crate::error;
use crate::gateway::ApiGateway;

const ROUTE: &str = "/admin/leaderboard";

/// CRUD façade for leaderboard entries. There is no update operation:
/// `position` is derived server-side, and scores change through the users
/// resource.
pub struct LeaderboardClient {
    gateway: Arc<ApiGateway>,
}

impl LeaderboardClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let resp = self
            .gateway
            .get(ROUTE)
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn get(&self, id: &str) -> Result<LeaderboardEntry, ApiError> {
        let resp = self
            .gateway
            .get(&format!("{ROUTE}/{id}"))
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    /// Create an entry. A structurally successful response may still be a
    /// domain rejection (score below the qualification threshold); that
    /// `{message}` body comes back on the error side, never as data.
    pub async fn create(&self, new: &NewLeaderboardEntry) -> Result<LeaderboardEntry, ApiError> {
        let resp = self
            .gateway
            .post(ROUTE, new)
            .await
            .map_err(error::from_transport)?;
        match error::read_json(resp).await? {
            LeaderboardCreateResponse::Created(entry) => Ok(entry),
            LeaderboardCreateResponse::Rejected(body) => Err(ApiError::new(body.message)),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .gateway
            .delete(&format!("{ROUTE}/{id}"))
            .await
            .map_err(error::from_transport)?;
        error::read_unit(resp).await
    }
}

/// Mutations on the leaderboard resource and the cache keys each one touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardMutation {
    Create,
    Delete(String),
}

impl LeaderboardMutation {
    pub fn affected_keys(&self) -> Vec<CacheKey> {
        match self {
            Self::Create => vec![CacheKey::Leaderboard],
            Self::Delete(id) => vec![
                CacheKey::Leaderboard,
                CacheKey::LeaderboardEntry(id.clone()),
            ],
        }
    }
}
