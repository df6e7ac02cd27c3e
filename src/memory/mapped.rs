//! Anonymous memory mappings for very large buffers.
//!
//! Large allocations bypass the heap and go straight to `mmap`. The mapping
//! belongs to exactly one [`MappedBlock`]; views share it through
//! `Arc<dyn StorageBlock>`, so the atomic strong count decides which drop is
//! the last one. That drop performs the `munmap`.
//!
//! # Release
//!
//! Views can be dropped concurrently from any thread (for example by a host
//! garbage collector finalising on a helper thread while the script releases
//! its own handle). `Arc` guarantees a single `Drop`, and the block also
//! latches an `AtomicBool` before unmapping so the syscall can never be
//! issued twice for the same region.

use super::{ArenaStats, StorageBlock, StorageKind};
use crate::error::{Error, Result};
use rustix::mm::{MapFlags, ProtFlags};
use std::ptr::NonNull;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A storage block backed by a private anonymous mapping.
pub struct MappedBlock {
    /// Pointer to the mmap'd region.
    ptr: NonNull<u8>,
    /// Size of the mapping.
    len: usize,
    /// Set once the region has been unmapped.
    released: AtomicBool,
    /// Arena counters to report the unmap to.
    stats: Option<Arc<ArenaStats>>,
}

impl MappedBlock {
    /// Map `size` bytes of zeroed, private memory.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero or `mmap` fails.
    pub fn new(size: usize) -> Result<Self> {
        Self::map(size, None)
    }

    pub(crate) fn with_stats(size: usize, stats: Arc<ArenaStats>) -> Result<Self> {
        Self::map(size, Some(stats))
    }

    fn map(size: usize, stats: Option<Arc<ArenaStats>>) -> Result<Self> {
        if size == 0 {
            return Err(Error::AllocationFailed(
                "mapping size must be greater than 0".into(),
            ));
        }

        let ptr = unsafe {
            rustix::mm::mmap_anonymous(
                std::ptr::null_mut(),
                size,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::PRIVATE,
            )
        }
        .map_err(|errno| {
            tracing::warn!(size, "mmap failed: {}", errno);
            Error::System(errno)
        })?;

        let ptr = NonNull::new(ptr.cast::<u8>())
            .ok_or_else(|| Error::AllocationFailed("mmap returned null".into()))?;

        tracing::debug!(size, "mapped anonymous region");

        Ok(Self {
            ptr,
            len: size,
            released: AtomicBool::new(false),
            stats,
        })
    }

    /// Has the mapping already been released?
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }

        // SAFETY: ptr/len describe the region mapped in `map`, and the latch
        // above guarantees this is the only unmap.
        if let Err(errno) = unsafe { rustix::mm::munmap(self.ptr.as_ptr().cast(), self.len) } {
            tracing::warn!(len = self.len, "munmap failed: {}", errno);
            return;
        }

        tracing::trace!(len = self.len, "released mapped region");
        if let Some(stats) = &self.stats {
            stats.record_unmap(self.len);
        }
    }
}

unsafe impl StorageBlock for MappedBlock {
    #[inline]
    fn as_mut_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn kind(&self) -> StorageKind {
        StorageKind::Mapped
    }
}

impl Drop for MappedBlock {
    fn drop(&mut self) {
        self.release();
    }
}

// SAFETY: the mapping is owned by this block alone; release is latched
// through an atomic.
unsafe impl Send for MappedBlock {}
unsafe impl Sync for MappedBlock {}
