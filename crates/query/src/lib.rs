//! Client-side query cache for the rewarddesk data layer.
//!
//! Each [`CacheKey`](rewarddesk_api::CacheKey) moves through
//! `Empty → Loading → {Fresh | Errored} → Stale → Loading → …`. Reads on a
//! fresh key are served from memory; concurrent reads on a cold key share a
//! single in-flight load; successful mutations mark their declared keys stale
//! through [`run_mutation`], which also routes the outcome to the
//! [`NotificationSink`].

pub mod cache;
pub mod notify;

pub use cache::{QueryCache, QueryState};
pub use notify::{run_mutation, NotificationSink};
