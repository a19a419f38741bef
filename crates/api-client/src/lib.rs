//! HTTP data layer for the rewarddesk admin console.
//!
//! One [`ApiGateway`] is the single point of egress: it owns the configured
//! `reqwest::Client`, the base URL, and the bearer credential installed by
//! the [`SessionStore`]. The typed resource clients wrap the gateway with
//! per-entity CRUD calls and route every failure through the error
//! normalizer, so callers only ever see `Result<T, ApiError>`.

pub mod error;
pub mod gateway;
pub mod resources;
pub mod session;

pub use gateway::ApiGateway;
pub use resources::batches::{BatchMutation, BatchesClient};
pub use resources::leaderboard::{LeaderboardClient, LeaderboardMutation};
pub use resources::tasks::{TaskMutation, TasksClient};
pub use resources::users::{UserMutation, UsersClient};
pub use session::SessionStore;
