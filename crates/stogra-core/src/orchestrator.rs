//! Bounded concurrent fan-out of independent provider lookups.
//!
//! A batch spawns one task per key on a [`JoinSet`]. Each task waits for a
//! semaphore permit, then runs its lookup under a per-call timeout. The batch
//! always settles: failures are reported per key and never abort siblings.
//!
//! Results come back in completion order. Callers that need a stable order
//! sort after collection.
//!
//! Dropping the returned future drops the `JoinSet`, which aborts lookups that
//! are still in flight.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::provider::ProviderError;

/// Why a single lookup produced no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Provider(ProviderError),
    TimedOut(Duration),
    /// The concurrency limiter was shut down before a permit was granted.
    Closed,
}

impl FetchFailure {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Provider(error) => error.code(),
            Self::TimedOut(_) => "fetch.timed_out",
            Self::Closed => "fetch.closed",
        }
    }
}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(error) => write!(f, "{error}"),
            Self::TimedOut(limit) => write!(f, "lookup exceeded {} ms", limit.as_millis()),
            Self::Closed => f.write_str("concurrency limiter closed"),
        }
    }
}

impl std::error::Error for FetchFailure {}

/// Outcome of one lookup, tagged with the key that produced it.
#[derive(Debug)]
pub struct Settled<K, T> {
    pub key: K,
    pub outcome: Result<T, FetchFailure>,
}

/// Runs lookup batches with bounded parallelism and per-call timeouts.
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    permits: Arc<Semaphore>,
    max_concurrency: usize,
    call_timeout: Duration,
}

impl FetchOrchestrator {
    /// `max_concurrency` is clamped to at least one.
    pub fn new(max_concurrency: usize, call_timeout: Duration) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            call_timeout,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Run `fetch` for every key and wait for all of them to settle.
    pub async fn settle_all<K, T, F, Fut>(
        &self,
        label: &'static str,
        keys: impl IntoIterator<Item = K>,
        fetch: F,
    ) -> Vec<Settled<K, T>>
    where
        K: Display + Send + 'static,
        T: Send + 'static,
        F: Fn(&K) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
    {
        let mut tasks = JoinSet::new();
        for key in keys {
            let lookup = fetch(&key);
            let permits = Arc::clone(&self.permits);
            let call_timeout = self.call_timeout;

            tasks.spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => match tokio::time::timeout(call_timeout, lookup).await {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(error)) => Err(FetchFailure::Provider(error)),
                        Err(_) => Err(FetchFailure::TimedOut(call_timeout)),
                    },
                    Err(_) => Err(FetchFailure::Closed),
                };
                Settled { key, outcome }
            });
        }

        let mut settled = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(item) => settled.push(item),
                Err(error) => warn!(label, %error, "lookup task did not complete"),
            }
        }

        debug!(label, settled = settled.len(), "lookup batch settled");
        settled
    }

    /// Like [`settle_all`](Self::settle_all) but keeps only successful values.
    ///
    /// Failed lookups are logged and contribute nothing.
    pub async fn gather<K, T, F, Fut>(
        &self,
        label: &'static str,
        keys: impl IntoIterator<Item = K>,
        fetch: F,
    ) -> Vec<T>
    where
        K: Display + Send + 'static,
        T: Send + 'static,
        F: Fn(&K) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
    {
        self.settle_all(label, keys, fetch)
            .await
            .into_iter()
            .filter_map(|Settled { key, outcome }| match outcome {
                Ok(value) => Some(value),
                Err(failure) => {
                    warn!(label, %key, code = failure.code(), error = %failure, "dropping failed lookup");
                    None
                }
            })
            .collect()
    }
}
