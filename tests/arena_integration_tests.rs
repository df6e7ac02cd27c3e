//! Integration tests for the storage arena.
//!
//! These tests exercise the arena through the public buffer surface: pool
//! layout, independence of pooled buffers, runtime pool resizing and the
//! release of mapped blocks when views are dropped from several threads.

use node_buffer::config::BufferConfig;
use node_buffer::memory::{AllocStrategy, StorageArena, StorageKind};
use node_buffer::Buffer;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn arena_with_threshold(mmap_threshold: usize) -> StorageArena {
    StorageArena::new(BufferConfig::default().with_mmap_threshold(mmap_threshold)).unwrap()
}

// ============================================================================
// Pool Independence Tests
// ============================================================================

/// Mutating one pooled buffer never touches its neighbours in the slab.
#[test]
fn test_pooled_buffers_are_independent() {
    let arena = arena_with_threshold(1 << 20);
    let bufs: Vec<Buffer> = (0..64).map(|i| arena.alloc_unsafe(i % 13 + 1).unwrap()).collect();

    for buf in &bufs {
        assert_eq!(buf.kind(), StorageKind::Pooled);
        buf.fill(0).unwrap();
    }

    bufs[17].fill(0xEE).unwrap();

    for (i, buf) in bufs.iter().enumerate() {
        let expected = if i == 17 { 0xEE } else { 0 };
        assert!(
            buf.to_vec().iter().all(|&b| b == expected),
            "buffer {i} was modified"
        );
    }
}

/// Neighbouring pooled buffers share a slab but never overlap.
#[test]
fn test_pooled_buffers_do_not_overlap() {
    let arena = arena_with_threshold(1 << 20);
    let a = arena.alloc_unsafe(5).unwrap();
    let b = arena.alloc_unsafe(5).unwrap();

    assert!(a.buffer().same_block(&b.buffer()));
    assert!(!a.shares_memory(&b));
    assert_eq!(b.byte_offset() % 8, 0);
    assert!(b.byte_offset() >= a.byte_offset() + a.len());
}

/// A slab stays alive while any view into it exists.
#[test]
fn test_slab_outlives_arena_cursor() {
    let arena = arena_with_threshold(1 << 20);
    let first = arena.alloc_unsafe(100).unwrap();
    first.fill(7).unwrap();
    let slab = first.buffer();

    // Force the arena onto a fresh slab.
    for _ in 0..4 {
        let _ = arena.alloc_unsafe(3000).unwrap();
    }
    assert!(first.to_vec().iter().all(|&b| b == 7));
    assert_eq!(slab.ref_count(), 2);

    drop(first);
    assert_eq!(slab.ref_count(), 1);
}

// ============================================================================
// Pool Size Tests
// ============================================================================

/// The pool size can change at runtime without disturbing existing buffers.
#[test]
fn test_pool_size_runtime_change() {
    let arena = arena_with_threshold(1 << 20);
    assert_eq!(arena.pool_size(), 8192);

    let old = arena.alloc_unsafe(2000).unwrap();
    assert_eq!(old.kind(), StorageKind::Pooled);
    old.fill(0x11).unwrap();

    // Shrinking the pool turns the same request into a dedicated one.
    arena.set_pool_size(1024);
    let big = arena.alloc_unsafe(2000).unwrap();
    assert_eq!(big.kind(), StorageKind::Dedicated);

    let small = arena.alloc_unsafe(100).unwrap();
    assert_eq!(small.kind(), StorageKind::Pooled);

    assert!(old.to_vec().iter().all(|&b| b == 0x11));
    assert_eq!(old.buffer().byte_length(), 8192);
}

/// A pool size of zero disables pooling entirely.
#[test]
fn test_zero_pool_size_disables_pooling() {
    let arena = StorageArena::new(BufferConfig::default().with_pool_size(0)).unwrap();
    for size in [1, 8, 100] {
        assert_eq!(arena.alloc_unsafe(size).unwrap().kind(), StorageKind::Dedicated);
    }
}

/// The process-wide pool size is visible through the static accessor.
#[test]
fn test_global_pool_size_is_introspectable() {
    assert_eq!(Buffer::pool_size(), StorageArena::global().pool_size());
}

// ============================================================================
// Mapped Release Tests
// ============================================================================

/// Dropping the last view unmaps exactly once, whichever thread drops it.
#[test]
fn test_mapped_release_exactly_once_across_threads() {
    let arena = arena_with_threshold(4096);
    let buf = arena.alloc(64 * 1024).unwrap();
    assert_eq!(buf.kind(), StorageKind::Mapped);
    buf.write_u32_le(0xDEADBEEF, 0).unwrap();

    let views: Vec<Buffer> = (0..8)
        .map(|i| buf.slice(i * 1024, Some((i + 1) * 1024)))
        .collect();
    drop(buf);

    let barrier = Arc::new(Barrier::new(views.len()));
    let handles: Vec<_> = views
        .into_iter()
        .map(|view| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let _ = view.read_u8(0).unwrap();
                barrier.wait();
                drop(view);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(arena.stats().mappings_released(), 1);
    assert_eq!(arena.stats().live_mappings(), 0);
}

/// Many independent mappings are each released once.
#[test]
fn test_many_mappings_released() {
    let arena = arena_with_threshold(4096);
    let bufs: Vec<Buffer> = (0..16).map(|_| arena.alloc_unsafe(8192).unwrap()).collect();
    assert_eq!(arena.stats().live_mappings(), 16);

    let clones: Vec<Buffer> = bufs.iter().map(|b| b.subarray(0, None)).collect();
    drop(bufs);
    assert_eq!(arena.stats().mappings_released(), 0);

    drop(clones);
    assert_eq!(arena.stats().mappings_released(), 16);
}

/// Explicit strategies are honoured below the mapping threshold.
#[test]
fn test_strategies_below_threshold() {
    let arena = arena_with_threshold(1 << 20);
    let zeroed = arena.allocate(128, AllocStrategy::Zeroed).unwrap();
    assert_eq!(zeroed.kind(), StorageKind::Dedicated);
    assert!(zeroed.to_vec().iter().all(|&b| b == 0));

    let slow = arena.allocate(16, AllocStrategy::Dedicated).unwrap();
    assert_eq!(slow.buffer().byte_length(), 16);
}

// ============================================================================
// External Memory Tests
// ============================================================================

/// Wrapped foreign memory aliases the original storage and is released once.
#[test]
fn test_external_memory_aliasing_and_release() {
    let released = Arc::new(AtomicUsize::new(0));
    let storage: &'static mut [u8] = Box::leak(vec![1u8, 2, 3, 4].into_boxed_slice());
    let ptr = NonNull::new(storage.as_mut_ptr()).unwrap();
    let len = storage.len();

    let counter = Arc::clone(&released);
    let addr = ptr.as_ptr() as usize;
    // SAFETY: the leaked allocation stays valid until the release callback
    // frees it, and is only touched through views.
    let buf = unsafe {
        Buffer::from_external(ptr, len, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            // SAFETY: reconstructs the box leaked above, exactly once.
            drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(addr as *mut u8, len)) });
        })
    };
    assert_eq!(buf.kind(), StorageKind::External);

    let tail = buf.slice(2, None);
    tail.put(0, 99u8);
    assert_eq!(buf.to_vec(), vec![1, 2, 99, 4]);

    drop(buf);
    assert_eq!(released.load(Ordering::SeqCst), 0);
    drop(tail);
    assert_eq!(released.load(Ordering::SeqCst), 1);
}
