use std::sync::Arc;

use rewarddesk_api::{ApiError, Batch, BatchUpdate, CacheKey, NewBatch};

use crate::error;
use crate::gateway::ApiGateway;

const ROUTE: &str = "/admin/batches";

/// CRUD façade for token-sale batches.
pub struct BatchesClient {
    gateway: Arc<ApiGateway>,
}

impl BatchesClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Batch>, ApiError> {
        let resp = self
            .gateway
            .get(ROUTE)
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn get(&self, id: &str) -> Result<Batch, ApiError> {
        let resp = self
            .gateway
            .get(&format!("{ROUTE}/{id}"))
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn create(&self, new: &NewBatch) -> Result<Batch, ApiError> {
        let resp = self
            .gateway
            .post(ROUTE, new)
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn update(&self, id: &str, changes: &BatchUpdate) -> Result<Batch, ApiError> {
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

/// Mutations on the batches resource and the cache keys each one touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchMutation {
    Create,
    Update(String),
    Delete(String),
}

impl BatchMutation {
    pub fn affected_keys(&self) -> Vec<CacheKey> {
        match self {
            Self::Create => vec![CacheKey::Batches],
            Self::Update(id) | Self::Delete(id) => {
                vec![CacheKey::Batches, CacheKey::Batch(id.clone())]
            }
        }
    }
}
