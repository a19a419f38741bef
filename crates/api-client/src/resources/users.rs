use std::sync::Arc;

use rewarddesk_api::{ApiError, CacheKey, NewUser, User, UserUpdate};

use crate::error;
use crate::gateway::ApiGateway;

const ROUTE: &str = "/admin/users";

/// CRUD façade for platform members.
pub struct UsersClient {
    gateway: Arc<ApiGateway>,
}

impl UsersClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let resp = self
            .gateway
            .get(ROUTE)
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        let resp = self
            .gateway
            .get(&format!("{ROUTE}/{id}"))
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn create(&self, new: &NewUser) -> Result<User, ApiError> {
        let resp = self
            .gateway
            .post(ROUTE, new)
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn update(&self, id: &str, changes: &UserUpdate) -> Result<User, ApiError> {
        let resp = self
            .gateway
            .put(&format!("{ROUTE}/{id}"), changes)
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
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

/// Mutations on the users resource and the cache keys each one touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMutation {
    Create,
    Update(String),
    Delete(String),
}

impl UserMutation {
    pub fn affected_keys(&self) -> Vec<CacheKey> {
        match self {
            Self::Create => vec![CacheKey::Users],
            Self::Update(id) | Self::Delete(id) => {
                vec![CacheKey::Users, CacheKey::User(id.clone())]
            }
        }
    }
}
