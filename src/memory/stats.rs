//! Allocation counters for a storage arena.

use crate::memory::StorageKind;
use crate::observability::metrics;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running allocation statistics of a [`StorageArena`](super::StorageArena).
///
/// Every counter is also exported through the `metrics` facade; this struct
/// keeps an in-process copy that can be inspected without a recorder.
#[derive(Debug, Default)]
pub struct ArenaStats {
    pooled: AtomicU64,
    dedicated: AtomicU64,
    mapped: AtomicU64,
    external: AtomicU64,
    bytes_allocated: AtomicU64,
    slabs_created: AtomicU64,
    mappings_released: AtomicU64,
}

impl ArenaStats {
    /// Create zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocations served with the given strategy.
    pub fn allocations(&self, kind: StorageKind) -> u64 {
        self.counter(kind).load(Ordering::Relaxed)
    }

    /// Total bytes handed out to views.
    pub fn bytes_allocated(&self) -> u64 {
        self.bytes_allocated.load(Ordering::Relaxed)
    }

    /// Number of pool slabs created.
    pub fn slabs_created(&self) -> u64 {
        self.slabs_created.load(Ordering::Relaxed)
    }

    /// Number of mapped blocks that have been unmapped.
    pub fn mappings_released(&self) -> u64 {
        self.mappings_released.load(Ordering::Acquire)
    }

    /// Mapped blocks still alive.
    pub fn live_mappings(&self) -> u64 {
        self.allocations(StorageKind::Mapped)
            .saturating_sub(self.mappings_released())
    }

    pub(crate) fn record_allocation(&self, kind: StorageKind, bytes: usize) {
        self.counter(kind).fetch_add(1, Ordering::Relaxed);
        self.bytes_allocated
            .fetch_add(bytes as u64, Ordering::Relaxed);
        metrics::record_allocation(kind, bytes);
    }

    pub(crate) fn record_slab(&self, size: usize) {
        self.slabs_created.fetch_add(1, Ordering::Relaxed);
        metrics::record_slab_created(size);
    }

    pub(crate) fn record_unmap(&self, bytes: usize) {
        self.mappings_released.fetch_add(1, Ordering::AcqRel);
        metrics::record_mapping_released(bytes);
    }

    fn counter(&self, kind: StorageKind) -> &AtomicU64 {
        match kind {
            StorageKind::Pooled => &self.pooled,
            StorageKind::Dedicated => &self.dedicated,
            StorageKind::Mapped => &self.mapped,
            StorageKind::External => &self.external,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = ArenaStats::new();
        stats.record_allocation(StorageKind::Pooled, 10);
        stats.record_allocation(StorageKind::Mapped, 100);
        stats.record_slab(8192);

        assert_eq!(stats.allocations(StorageKind::Pooled), 1);
        assert_eq!(stats.allocations(StorageKind::Dedicated), 0);
        assert_eq!(stats.bytes_allocated(), 110);
        assert_eq!(stats.slabs_created(), 1);
        assert_eq!(stats.live_mappings(), 1);

        stats.record_unmap(100);
        assert_eq!(stats.live_mappings(), 0);
    }
}
