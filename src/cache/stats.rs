//! Cache Statistics Module
//!
//! Counters for hits, misses, populations, lock contention, stampede
//! fallbacks and swallowed store errors.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads that found a value
    pub hits: u64,
    /// Reads that found nothing (absent, expired, undecodable or store error)
    pub misses: u64,
    /// Factory results written to the store by a lock holder
    pub populations: u64,
    /// Populate attempts that found the lock already held
    pub lock_contentions: u64,
    /// Waiters that gave up polling and ran the factory uncached
    pub stampede_fallbacks: u64,
    /// Store failures logged and swallowed
    pub store_errors: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by every caller of a `Cache`.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    populations: AtomicU64,
    lock_contentions: AtomicU64,
    stampede_fallbacks: AtomicU64,
    store_errors: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_population(&self) {
        self.populations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_lock_contention(&self) {
        self.lock_contentions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stampede_fallback(&self) {
        self.stampede_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_store_error(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            populations: self.populations.load(Ordering::Relaxed),
            lock_contentions: self.lock_contentions.load(Ordering::Relaxed),
            stampede_fallbacks: self.stampede_fallbacks.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_starts_at_zero() {
        let stats = StatsRecorder::default().snapshot();
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::default();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();
        assert_eq!(recorder.snapshot().hit_rate(), 0.75);
    }

    #[test]
    fn test_counters_are_independent() {
        let recorder = StatsRecorder::default();
        recorder.record_population();
        recorder.record_lock_contention();
        recorder.record_lock_contention();
        recorder.record_stampede_fallback();
        recorder.record_store_error();

        let stats = recorder.snapshot();
        assert_eq!(stats.populations, 1);
        assert_eq!(stats.lock_contentions, 2);
        assert_eq!(stats.stampede_fallbacks, 1);
        assert_eq!(stats.store_errors, 1);
        assert_eq!(stats.hits, 0);
    }
}
