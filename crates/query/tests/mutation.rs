//! Mutation driver: invalidation contract and exactly-one notification.

use std::sync::Mutex;

use rewarddesk_api::{ApiError, CacheKey};
use rewarddesk_query::{run_mutation, NotificationSink, QueryCache, QueryState};

#[derive(Default)]
struct RecordingSink {
    successes: Mutex<Vec<String>>,
    failures: Mutex<Vec<ApiError>>,
}

impl NotificationSink for RecordingSink {
    fn success(&self, message: &str) {
        self.successes.lock().expect("lock").push(message.to_string());
    }

    fn failure(&self, error: &ApiError) {
        self.failures.lock().expect("lock").push(error.clone());
    }
}

async fn seed(cache: &QueryCache, key: &CacheKey) {
    cache
        .fetch(key, || async { Ok::<_, ApiError>(1u32) })
        .await
        .expect("seed");
    assert_eq!(cache.state(key), QueryState::Fresh);
}

#[tokio::test]
async fn successful_mutation_invalidates_declared_keys_and_notifies_once() {
    let cache = QueryCache::new();
    let sink = RecordingSink::default();
    let affected = [CacheKey::Users, CacheKey::User("u1".into())];
    seed(&cache, &affected[0]).await;
    seed(&cache, &affected[1]).await;

    run_mutation(&cache, &sink, &affected, "user u1 updated", async {
        Ok::<_, ApiError>(())
    })
    .await
    .expect("mutation");

    assert_eq!(cache.state(&affected[0]), QueryState::Stale);
    assert_eq!(cache.state(&affected[1]), QueryState::Stale);
    assert_eq!(
        *sink.successes.lock().expect("lock"),
        vec!["user u1 updated".to_string()]
    );
    assert!(sink.failures.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn failed_mutation_leaves_cache_untouched_and_reports_failure() {
    let cache = QueryCache::new();
    let sink = RecordingSink::default();
    let affected = [CacheKey::Tasks];
    seed(&cache, &affected[0]).await;

    let err = run_mutation(&cache, &sink, &affected, "task created", async {
        Err::<(), _>(ApiError::with_status("denied", 403))
    })
    .await
    .expect_err("mutation fails");
    assert_eq!(err.status, Some(403));

    assert_eq!(cache.state(&affected[0]), QueryState::Fresh);
    assert!(sink.successes.lock().expect("lock").is_empty());
    let failures = sink.failures.lock().expect("lock");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].message, "denied");
}

#[tokio::test]
async fn next_read_after_a_successful_mutation_hits_the_network() {
    let cache = QueryCache::new();
    let sink = RecordingSink::default();
    let calls = std::sync::atomic::AtomicUsize::new(0);
    let loader = || async {
        calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok::<_, ApiError>(vec![1u64])
    };

    cache.fetch(&CacheKey::Batches, loader).await.expect("seed");
    run_mutation(&cache, &sink, &[CacheKey::Batches], "batch created", async {
        Ok::<_, ApiError>(())
    })
    .await
    .expect("mutation");

    cache.fetch(&CacheKey::Batches, loader).await.expect("read");
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}
