use std::sync::Arc;

use tracing::warn;

use rewarddesk_api::{ApiError, CacheKey, NewTask, Task, TaskUpdate};

use crate::error;
use crate::gateway::ApiGateway;

/// Canonical task route.
pub const TASKS_ROUTE: &str = "/admin/tasks";
/// Deprecated route prefix exposed by backends that predate the admin routes.
pub const LEGACY_TASKS_ROUTE: &str = "/api/tasks";

/// CRUD façade for reward tasks.
pub struct TasksClient {
    gateway: Arc<ApiGateway>,
    route: &'static str,
}

impl TasksClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            gateway,
            route: TASKS_ROUTE,
        }
    }

    /// Target the deprecated `/api/tasks` routes instead of the canonical
    /// `/admin/tasks`. Kept only for backends that have not been migrated.
    pub fn with_legacy_routes(gateway: Arc<ApiGateway>) -> Self {
        warn!("task routes: using deprecated {LEGACY_TASKS_ROUTE} prefix");
        Self {
            gateway,
            route: LEGACY_TASKS_ROUTE,
        }
    }

    pub fn route(&self) -> &'static str {
        self.route
    }

    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let resp = self
            .gateway
            .get(self.route)
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn get(&self, id: &str) -> Result<Task, ApiError> {
        let resp = self
            .gateway
            .get(&format!("{}/{id}", self.route))
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn create(&self, new: &NewTask) -> Result<Task, ApiError> {
        let resp = self
            .gateway
            .post(self.route, new)
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn update(&self, id: &str, changes: &TaskUpdate) -> Result<Task, ApiError> {
        let resp = self
            .gateway
            .put(&format!("{}/{id}", self.route), changes)
            .await
            .map_err(error::from_transport)?;
        error::read_json(resp).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .gateway
            .delete(&format!("{}/{id}", self.route))
            .await
            .map_err(error::from_transport)?;
        error::read_unit(resp).await
    }
}

/// Mutations on the tasks resource and the cache keys each one touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMutation {
    Create,
    Update(String),
    Delete(String),
}

impl TaskMutation {
    pub fn affected_keys(&self) -> Vec<CacheKey> {
        match self {
            Self::Create => vec![CacheKey::Tasks],
            Self::Update(id) | Self::Delete(id) => {
                vec![CacheKey::Tasks, CacheKey::Task(id.clone())]
            }
        }
    }
}
