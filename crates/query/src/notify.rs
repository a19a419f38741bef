use std::future::Future;

use rewarddesk_api::{ApiError, CacheKey};

use crate::cache::QueryCache;

/// Surfaces exactly one outcome message per completed operation — success or
/// failure, never both, never silently dropped.
pub trait NotificationSink: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, error: &ApiError);
}

/// Drive one mutation through the invalidation contract.
///
/// Awaits `op`; on success every key in `affected` is marked stale —
/// sequenced strictly after the mutation's acknowledgment — and the sink is
/// told once. On failure the cache is left untouched and the sink receives
/// the normalized error instead.
pub async fn run_mutation<T, Fut>(
    cache: &QueryCache,
    sink: &dyn NotificationSink,
    affected: &[CacheKey],
    success_message: &str,
    op: Fut,
) -> Result<T, ApiError>
where
    Fut: Future<Output = Result<T, ApiError>>,
{
    match op.await {
        Ok(value) => {
            for key in affected {
                cache.invalidate(key);
            }
            sink.success(success_message);
            Ok(value)
        }
        Err(err) => {
            sink.failure(&err);
            Err(err)
        }
    }
}
