//! Time-boxed read-through cache
//!
//! Two states: fresh (age < ttl) and stale (age >= ttl, or nothing stored).
//! Fresh reads do no I/O. A stale read starts one refresh task; every stale
//! reader, the one that started it included, awaits that task's outcome over
//! a watch channel. The task is detached, so a reader that gives up does not
//! cancel it and the snapshot is still stored for later readers. A failed
//! load leaves the stored snapshot untouched.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, warn};

use crate::core::error::FetchError;
use crate::core::traits::Clock;

/// Value and the time it was computed, always replaced together
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of a refresh task, `None` while it is still running
type Outcome<T> = Option<Result<T, FetchError>>;

pub struct ReadThroughCache<T> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    snapshot: Arc<RwLock<Option<Snapshot<T>>>>,
    in_flight: Mutex<Option<watch::Receiver<Outcome<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> ReadThroughCache<T> {
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl,
            clock,
            snapshot: Arc::new(RwLock::new(None)),
            in_flight: Mutex::new(None),
        }
    }

    /// Current snapshot regardless of age
    pub async fn peek(&self) -> Option<Snapshot<T>> {
        self.snapshot.read().await.clone()
    }

    /// Drop the stored snapshot so the next read refreshes
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }

    pub async fn is_fresh(&self) -> bool {
        self.fresh_value().await.is_some()
    }

    async fn fresh_value(&self) -> Option<T> {
        let guard = self.snapshot.read().await;
        let snapshot = guard.as_ref()?;
        // a timestamp in the future counts as age zero
        let age = (self.clock.now() - snapshot.fetched_at)
            .to_std()
            .unwrap_or_default();
        (age < self.ttl).then(|| snapshot.value.clone())
    }

    /// Return the fresh value, or the outcome of the refresh in flight.
    ///
    /// `loader` only runs when no refresh is already in flight. Its error is
    /// returned to every waiting reader and nothing is stored.
    pub async fn get_or_refresh<F, Fut>(&self, loader: F) -> Result<T, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        if let Some(value) = self.fresh_value().await {
            return Ok(value);
        }

        let mut outcome = {
            let mut in_flight = self.in_flight.lock().await;
            // a refresh may have landed while we waited on the gate
            if let Some(value) = self.fresh_value().await {
                return Ok(value);
            }

            let running = in_flight
                .as_ref()
                .filter(|receiver| receiver.borrow().is_none())
                .cloned();
            match running {
                Some(receiver) => {
                    debug!("{} cache refresh already in flight, waiting", self.name);
                    receiver
                }
                None => {
                    let receiver = self.spawn_refresh(loader());
                    *in_flight = Some(receiver.clone());
                    receiver
                }
            }
        };

        let result = match outcome.wait_for(Option::is_some).await {
            Ok(done) => done.clone(),
            Err(_) => None,
        };
        result.unwrap_or_else(|| {
            Err(FetchError::Aborted(format!(
                "{} cache refresh task ended without a result",
                self.name
            )))
        })
    }

    fn spawn_refresh<Fut>(&self, load: Fut) -> watch::Receiver<Outcome<T>>
    where
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let (sender, receiver) = watch::channel(None);
        let name = self.name;
        let snapshot = self.snapshot.clone();
        let clock = self.clock.clone();

        debug!("{} cache stale, refreshing", name);
        tokio::spawn(async move {
            let result = load.await;
            match &result {
                Ok(value) => {
                    // stored before readers are woken so they see it as fresh
                    *snapshot.write().await = Some(Snapshot {
                        value: value.clone(),
                        fetched_at: clock.now(),
                    });
                }
                Err(e) => warn!("{} cache refresh failed: {}", name, e),
            }
            // no receivers left is fine: the snapshot is already stored
            let _ = sender.send(Some(result));
        });

        receiver
    }
}
