//! Global poster fetch concurrency limiter.
//!
//! A list can hold hundreds of entries, and every cache miss turns into a
//! poster download. Fetching them all at once would exhaust connections and
//! invite rate limiting from the image host, so all fetch tasks share one
//! semaphore-backed limiter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Limiter for concurrent poster fetches.
///
/// The permit is automatically released when dropped.
#[derive(Debug)]
pub struct FetchLimiter {
    /// Semaphore controlling concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Maximum permits (for stats/debugging)
    max_permits: usize,

    /// Current number of in-flight fetches (for metrics)
    in_flight: AtomicUsize,
}

impl FetchLimiter {
    /// Creates a new limiter with the specified maximum concurrent fetches.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0.
    pub fn new(max_concurrent: usize) -> Self {
        assert!(max_concurrent > 0, "max_concurrent must be > 0");

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_permits: max_concurrent,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Acquires a permit for a poster fetch, waiting if the limit has been
    /// reached.
    pub async fn acquire(&self) -> FetchPermit<'_> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed unexpectedly");

        self.in_flight.fetch_add(1, Ordering::Relaxed);

        FetchPermit {
            _permit: permit,
            in_flight: &self.in_flight,
        }
    }

    /// Current number of in-flight fetches.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Maximum concurrent fetches allowed.
    pub fn max_permits(&self) -> usize {
        self.max_permits
    }
}

/// RAII permit for one poster fetch.
#[derive(Debug)]
pub struct FetchPermit<'a> {
    _permit: OwnedSemaphorePermit,
    in_flight: &'a AtomicUsize,
}

impl Drop for FetchPermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
