use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::debug;

use rewarddesk_api::{ApiError, CacheKey};

type Stored = Arc<dyn Any + Send + Sync>;

/// Lifecycle of one cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryState {
    /// Never loaded.
    #[default]
    Empty,
    /// A load is in flight; concurrent readers share it.
    Loading,
    /// Cached value is current; reads are served without a network call.
    Fresh,
    /// The last load failed; the next read retries.
    Errored,
    /// A value is cached but flagged for refetch on the next read.
    Stale,
}

#[derive(Default)]
struct Slot {
    state: QueryState,
    /// Last successfully loaded value. Survives `Stale` and `Loading` so
    /// subscribers can keep displaying it while a refetch runs.
    value: Option<Stored>,
    error: Option<ApiError>,
    /// Bumped by every invalidation. A load that started under an older
    /// epoch lands `Stale` instead of `Fresh`.
    epoch: u64,
    flight: Option<watch::Receiver<()>>,
}

/// Keyed cache of the last-known server state per resource collection.
///
/// Bookkeeping sits behind a plain mutex that is never held across an await;
/// loads themselves run outside the lock. At most one load per key is in
/// flight at a time.
#[derive(Default)]
pub struct QueryCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

enum Role {
    Hit(Stored),
    Wait(watch::Receiver<()>),
    Own { tx: watch::Sender<()>, epoch: u64 },
}

/// Resets an abandoned flight so the key cannot wedge in `Loading` if the
/// owning fetch is dropped mid-load. Disarmed on normal completion.
struct OwnerGuard<'a> {
    cache: &'a QueryCache,
    key: CacheKey,
    armed: bool,
}

impl OwnerGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for OwnerGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut slots) = self.cache.slots.lock() {
            if let Some(slot) = slots.get_mut(&self.key) {
                if slot.state == QueryState::Loading {
                    slot.state = if slot.value.is_some() {
                        QueryState::Stale
                    } else {
                        QueryState::Empty
                    };
                    slot.flight = None;
                }
            }
        }
        // The watch sender drops right after this guard, waking any waiters;
        // one of them takes over as the new owner.
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `key`, loading it with `loader` if there is no fresh value.
    ///
    /// A fresh hit returns without calling the loader. If a load is already
    /// in flight the call waits for it and shares its outcome. A stale or
    /// errored key starts a new load. The loader may be called more than
    /// once only if this fetch has to take over a flight abandoned by a
    /// dropped caller.
    pub async fn fetch<T, F, Fut>(&self, key: &CacheKey, loader: F) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        loop {
            let role = {
                let mut slots = self.slots.lock().expect("cache lock poisoned");
                let slot = slots.entry(key.clone()).or_default();
                match (slot.state, slot.value.clone(), slot.flight.clone()) {
                    (QueryState::Fresh, Some(value), _) => Role::Hit(value),
                    (QueryState::Loading, _, Some(rx)) => Role::Wait(rx),
                    _ => {
                        let (tx, rx) = watch::channel(());
                        slot.state = QueryState::Loading;
                        slot.flight = Some(rx);
                        debug!(key = %key, "cache miss, starting load");
                        Role::Own {
                            tx,
                            epoch: slot.epoch,
                        }
                    }
                }
            };

            match role {
                Role::Hit(value) => return downcast::<T>(value, key),
                Role::Wait(mut rx) => {
                    // Woken when the flight completes or its owner gives up.
                    let _ = rx.changed().await;
                    let outcome = {
                        let slots = self.slots.lock().expect("cache lock poisoned");
                        slots.get(key).and_then(|slot| match slot.state {
                            QueryState::Fresh | QueryState::Stale => {
                                slot.value.clone().map(Ok)
                            }
                            QueryState::Errored => Some(Err(slot
                                .error
                                .clone()
                                .unwrap_or_else(|| ApiError::new("load failed")))),
                            _ => None,
                        })
                    };
                    match outcome {
                        Some(Ok(value)) => return downcast::<T>(value, key),
                        Some(Err(err)) => return Err(err),
                        // Owner abandoned or a new flight replaced this one.
                        None => continue,
                    }
                }
                Role::Own { tx, epoch } => {
                    let guard = OwnerGuard {
                        cache: self,
                        key: key.clone(),
                        armed: true,
                    };
                    let result = loader().await;
                    let outcome = {
                        let mut slots = self.slots.lock().expect("cache lock poisoned");
                        let slot = slots.entry(key.clone()).or_default();
                        slot.flight = None;
                        let outcome = match result {
                            Ok(value) => {
                                let stored: Stored = Arc::new(value);
                                slot.value = Some(stored.clone());
                                slot.error = None;
                                slot.state = if slot.epoch == epoch {
                                    QueryState::Fresh
                                } else {
                                    // Invalidated while loading: the value is
                                    // usable but the next read must refetch.
                                    QueryState::Stale
                                };
                                Ok(stored)
                            }
                            Err(err) => {
                                slot.error = Some(err.clone());
                                slot.state = QueryState::Errored;
                                debug!(key = %key, error = %err, "load failed");
                                Err(err)
                            }
                        };
                        // Wake waiters only after the slot reflects the result.
                        let _ = tx.send(());
                        outcome
                    };
                    guard.disarm();
                    return outcome.and_then(|value| downcast::<T>(value, key));
                }
            }
        }
    }

    /// Last known value for `key`, fresh or stale, without triggering a load.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &CacheKey) -> Option<Arc<T>> {
        self.slots
            .lock()
            .expect("cache lock poisoned")
            .get(key)
            .and_then(|slot| slot.value.clone())
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn state(&self, key: &CacheKey) -> QueryState {
        self.slots
            .lock()
            .expect("cache lock poisoned")
            .get(key)
            .map(|slot| slot.state)
            .unwrap_or(QueryState::Empty)
    }

    /// Flag `key` for refetch on the next read, keeping any cached value
    /// available in the meantime.
    pub fn invalidate(&self, key: &CacheKey) {
        let mut slots = self.slots.lock().expect("cache lock poisoned");
        let slot = slots.entry(key.clone()).or_default();
        slot.epoch += 1;
        match slot.state {
            QueryState::Fresh => {
                slot.state = QueryState::Stale;
                debug!(key = %key, "invalidated");
            }
            QueryState::Errored => {
                slot.state = QueryState::Empty;
                slot.error = None;
            }
            // In-flight loads land stale via the epoch check.
            QueryState::Loading | QueryState::Empty | QueryState::Stale => {}
        }
    }

    /// Drop every cached value, e.g. when the operator identity changes.
    pub fn clear(&self) {
        self.slots.lock().expect("cache lock poisoned").clear();
    }
}

fn downcast<T: Send + Sync + 'static>(value: Stored, key: &CacheKey) -> Result<Arc<T>, ApiError> {
    value
        .downcast::<T>()
        .map_err(|_| ApiError::new(format!("cache value type mismatch for key {key}")))
}
