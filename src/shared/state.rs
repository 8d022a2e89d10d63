//! Runtime counters for the enrichment coordinator

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the coordinator as batches flow through
#[derive(Debug, Default)]
pub struct CoordinatorStats {
    received: AtomicU64,
    published: AtomicU64,
    stale: AtomicU64,
    lookups: AtomicU64,
    unresolved: AtomicU64,
}

impl CoordinatorStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// A batch finished after a newer one was already published
    pub fn record_stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookups(&self, lookups: usize, unresolved: usize) {
        self.lookups.fetch_add(lookups as u64, Ordering::Relaxed);
        self.unresolved.fetch_add(unresolved as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CoordinatorStatsSnapshot {
        CoordinatorStatsSnapshot {
            batches_received: self.received.load(Ordering::Relaxed),
            batches_published: self.published.load(Ordering::Relaxed),
            batches_stale: self.stale.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CoordinatorStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinatorStatsSnapshot {
    pub batches_received: u64,
    pub batches_published: u64,
    pub batches_stale: u64,
    /// Directory lookups issued for detections without team info
    pub lookups: u64,
    /// Detections dropped because no team matched
    pub unresolved: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counts() {
        let stats = CoordinatorStats::new();
        stats.record_received();
        stats.record_received();
        stats.record_published();
        stats.record_stale();
        stats.record_lookups(5, 2);

        assert_eq!(
            stats.snapshot(),
            CoordinatorStatsSnapshot {
                batches_received: 2,
                batches_published: 1,
                batches_stale: 1,
                lookups: 5,
                unresolved: 2,
            }
        );
    }
}
