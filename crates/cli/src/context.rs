use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use rewarddesk_api::Identity;
use rewarddesk_api_client::{
    ApiGateway, BatchesClient, LeaderboardClient, SessionStore, TasksClient, UsersClient,
};
use rewarddesk_query::QueryCache;

use crate::config::{self, CliConfig};

/// Everything a command needs: the configured gateway, the restored session,
/// the per-invocation query cache, and resource-client constructors.
pub struct AppContext {
    pub config: CliConfig,
    pub gateway: Arc<ApiGateway>,
    pub session: SessionStore,
    pub cache: QueryCache,
}

impl AppContext {
    pub fn init() -> Result<Self> {
        let config = config::load_config()?;
        let gateway = Arc::new(ApiGateway::new(
            &config.server.url,
            Duration::from_secs(config.server.timeout_secs),
        )?);
        let session = SessionStore::new(gateway.clone(), config::config_dir()?);
        session.restore();
        Ok(Self {
            config,
            gateway,
            session,
            cache: QueryCache::new(),
        })
    }

    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.gateway.clone())
    }

    pub fn tasks(&self) -> TasksClient {
        if self.config.tasks.legacy_routes {
            TasksClient::with_legacy_routes(self.gateway.clone())
        } else {
            TasksClient::new(self.gateway.clone())
        }
    }

    pub fn leaderboard(&self) -> LeaderboardClient {
        LeaderboardClient::new(self.gateway.clone())
    }

    pub fn batches(&self) -> BatchesClient {
        BatchesClient::new(self.gateway.clone())
    }

    pub fn require_identity(&self) -> Result<Identity> {
        self.session
            .identity()
            .context("not logged in (run `rewarddesk login <email> <password>`)")
    }
}
