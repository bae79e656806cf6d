//! Bounded concurrency for backend calls.
//!
//! Every backend call goes through a [`ConcurrencyGate`]. Calls beyond the capacity queue for
//! a permit. The call itself runs in a spawned task that owns its permit and its timeout, so
//! a caller that stops waiting never strands a slot: the task finishes or times out on its
//! own and the permit is released when it ends.

use std::{future::Future, sync::Arc, time::Duration};

use cirrus_config::PoolSettings;
use tokio::{sync::Semaphore, time};
use tracing::debug;

use crate::error::BackendError;

/// A named limit on simultaneous backend calls.
#[derive(Debug)]
pub struct ConcurrencyGate {
    /// Pool name, used in errors and logs.
    name: String,
    /// Permits for in-flight calls.
    semaphore: Arc<Semaphore>,
    /// Number of permits the gate was created with.
    capacity: usize,
    /// Per-call timeout.
    timeout: Duration,
}

impl ConcurrencyGate {
    /// Creates a gate. A capacity of zero is raised to one.
    pub fn new(name: impl Into<String>, capacity: usize, timeout: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            name: name.into(),
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            timeout,
        }
    }

    /// Creates a gate from pool settings.
    pub fn from_settings(settings: &PoolSettings) -> Self {
        Self::new(
            settings.name.clone(),
            settings.max_concurrent,
            settings.timeout(),
        )
    }

    /// Returns the pool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of calls currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.capacity
            .saturating_sub(self.semaphore.available_permits())
    }

    /// Runs `work` once a permit is available, bounded by the gate timeout.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn run<F, T>(&self, work: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| BackendError::PoolClosed(self.name.clone()))?;

        let timeout = self.timeout;
        let handle = tokio::spawn(async move {
            let _permit = permit;
            time::timeout(timeout, work).await
        });

        match handle.await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                debug!(pool = %self.name, ?timeout, "backend call timed out");
                Err(BackendError::Timeout {
                    pool: self.name.clone(),
                    timeout,
                })
            }
            Err(err) => Err(BackendError::TaskFailed(err.to_string())),
        }
    }

    /// Stops admitting calls. Queued and future calls fail with [`BackendError::PoolClosed`].
    pub fn close(&self) {
        self.semaphore.close();
    }
}
