//! Metrics collection using metrics-rs.

use crate::memory::StorageKind;
use metrics::{Unit, counter};
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether metrics have been initialized.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

// Metric names as constants for consistency
const ALLOCATIONS: &str = "node_buffer_allocations";
const BYTES_ALLOCATED: &str = "node_buffer_bytes_allocated";
const SLABS_CREATED: &str = "node_buffer_slabs_created";
const SLAB_BYTES: &str = "node_buffer_slab_bytes";
const MAPPINGS_RELEASED: &str = "node_buffer_mappings_released";
const MAPPED_BYTES_RELEASED: &str = "node_buffer_mapped_bytes_released";

/// Initialize metrics descriptions.
///
/// Call this once at application startup.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    metrics::describe_counter!(
        ALLOCATIONS,
        Unit::Count,
        "Buffer allocations by storage strategy"
    );
    metrics::describe_counter!(
        BYTES_ALLOCATED,
        Unit::Bytes,
        "Total bytes handed out to buffer views"
    );
    metrics::describe_counter!(SLABS_CREATED, Unit::Count, "Pool slabs created");
    metrics::describe_counter!(SLAB_BYTES, Unit::Bytes, "Bytes reserved for pool slabs");
    metrics::describe_counter!(
        MAPPINGS_RELEASED,
        Unit::Count,
        "Memory-mapped blocks released"
    );
    metrics::describe_counter!(
        MAPPED_BYTES_RELEASED,
        Unit::Bytes,
        "Bytes returned to the OS by munmap"
    );
}

/// Record an allocation served with the given strategy.
#[inline]
pub(crate) fn record_allocation(kind: StorageKind, bytes: usize) {
    counter!(ALLOCATIONS, "strategy" => kind.as_str()).increment(1);
    counter!(BYTES_ALLOCATED, "strategy" => kind.as_str()).increment(bytes as u64);
}

/// Record a new pool slab.
#[inline]
pub(crate) fn record_slab_created(bytes: usize) {
    counter!(SLABS_CREATED).increment(1);
    counter!(SLAB_BYTES).increment(bytes as u64);
}

/// Record an unmapped block.
#[inline]
pub(crate) fn record_mapping_released(bytes: usize) {
    counter!(MAPPINGS_RELEASED).increment(1);
    counter!(MAPPED_BYTES_RELEASED).increment(bytes as u64);
}
