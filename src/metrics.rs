//! Run-wide request counters shared by all workers.
//!
//! The total counter is a lock-free atomic. The status breakdown sits behind
//! one mutex: workers only ever write to it, and it is read once, after every
//! worker has been joined.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Status key under which transport failures (no response received) are counted.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Result of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A response arrived with this status code, whatever its class.
    Status(u16),
    /// No response was received (connect, DNS, TLS, timeout, ...).
    TransportFailure,
}

impl Outcome {
    /// The key this outcome is counted under.
    pub fn status_key(self) -> u16 {
        match self {
            Outcome::Status(code) => code,
            Outcome::TransportFailure => TRANSPORT_FAILURE_STATUS,
        }
    }
}

/// Shared, concurrency-safe counters for one load test run.
#[derive(Debug)]
pub struct Aggregator {
    total_requests: AtomicU64,
    status_counts: Mutex<HashMap<u16, u64>>,
    start_time: Instant,
}

impl Aggregator {
    /// Creates an empty aggregator whose time window opens now.
    pub fn start() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            status_counts: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Counts one finished request.
    pub fn record(&self, outcome: Outcome) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        *self.lock_counts().entry(outcome.status_key()).or_insert(0) += 1;
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Closes the time window and takes a snapshot of the counters.
    ///
    /// Must be called after every worker has been joined.
    pub fn finalize(&self) -> FinalMetrics {
        let end_time = Instant::now();
        let status_counts = self
            .lock_counts()
            .iter()
            .map(|(&status, &count)| (status, count))
            .collect();

        FinalMetrics {
            total_requests: self.total_requests(),
            status_counts,
            start_time: self.start_time,
            end_time,
        }
    }

    // Counts are plain integers; a poisoned lock still holds valid data.
    fn lock_counts(&self) -> MutexGuard<'_, HashMap<u16, u64>> {
        self.status_counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Frozen counters of a completed run, consumed by the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalMetrics {
    pub total_requests: u64,
    /// Status code to occurrence count, ascending by code.
    pub status_counts: BTreeMap<u16, u64>,
    pub start_time: Instant,
    pub end_time: Instant,
}

impl FinalMetrics {
    pub fn elapsed(&self) -> Duration {
        self.end_time.duration_since(self.start_time)
    }

    /// Occurrences of `status`, zero if it was never observed.
    pub fn count_for(&self, status: u16) -> u64 {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    pub fn successful_requests(&self) -> u64 {
        self.count_for(200)
    }

    pub fn failed_requests(&self) -> u64 {
        self.count_for(TRANSPORT_FAILURE_STATUS)
    }

    /// Sum of every per-status count, including transport failures.
    pub fn counted_requests(&self) -> u64 {
        self.status_counts.values().sum()
    }
}
