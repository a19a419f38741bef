//! Typed CRUD façades, one per backend entity.
//!
//! Every operation returns `Result<T, ApiError>` — exactly one side ever
//! populated. Each module also declares, as data, which cache keys its
//! mutations touch (`*Mutation::affected_keys`), so the invalidation
//! contract is visible next to the client instead of inferred from call
//! order.

pub mod batches;
pub mod leaderboard;
pub mod tasks;
pub mod users;
