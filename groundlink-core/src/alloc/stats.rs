//! ## groundlink-core::alloc::stats
//! **Buffer pool counters**

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct PoolStats {
    checkouts: AtomicUsize,
    checkins: AtomicUsize,
    allocations: AtomicUsize,
    discards: AtomicUsize,
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment_checkouts(&self) {
        self.checkouts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_checkins(&self) {
        self.checkins.fetch_add(1, Ordering::Relaxed);
    }

    /// A checkout found the free-list empty.
    #[inline]
    pub fn increment_allocations(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    /// A returned buffer did not fit back into the free-list.
    #[inline]
    pub fn increment_discards(&self) {
        self.discards.fetch_add(1, Ordering::Relaxed);
    }

    pub fn checkouts(&self) -> usize {
        self.checkouts.load(Ordering::Relaxed)
    }

    pub fn checkins(&self) -> usize {
        self.checkins.load(Ordering::Relaxed)
    }

    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    pub fn discards(&self) -> usize {
        self.discards.load(Ordering::Relaxed)
    }

    /// Buffers currently on loan.
    pub fn outstanding(&self) -> usize {
        self.checkouts().saturating_sub(self.checkins())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_stats_increment_and_read() {
        let stats = PoolStats::new();
        assert_eq!(stats.checkouts(), 0);

        for _ in 0..3 {
            stats.increment_checkouts();
        }
        stats.increment_checkins();
        stats.increment_allocations();
        stats.increment_discards();

        assert_eq!(stats.checkouts(), 3);
        assert_eq!(stats.checkins(), 1);
        assert_eq!(stats.allocations(), 1);
        assert_eq!(stats.discards(), 1);
        assert_eq!(stats.outstanding(), 2);
    }
}
