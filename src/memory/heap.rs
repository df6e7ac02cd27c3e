//! Heap-backed storage blocks (pool slabs and dedicated allocations).

use super::{StorageBlock, StorageKind};
use crate::error::{Error, Result};
use std::ptr::NonNull;

/// A storage block backed by a heap allocation.
///
/// Used both for dedicated buffers and for the slabs that pooled buffers are
/// carved from; the two differ only in their [`StorageKind`] tag.
///
/// # Example
///
/// ```rust
/// use node_buffer::memory::{HeapBlock, StorageBlock, StorageKind};
///
/// let block = HeapBlock::dedicated(1024).unwrap();
/// assert_eq!(block.len(), 1024);
/// assert_eq!(block.kind(), StorageKind::Dedicated);
/// ```
pub struct HeapBlock {
    /// Start of the allocation, obtained from `Box::into_raw`.
    ptr: NonNull<u8>,
    /// Size of the allocation.
    len: usize,
    kind: StorageKind,
}

impl HeapBlock {
    /// Allocate a standalone block of `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the allocator cannot satisfy the
    /// request. Zero-sized blocks are valid.
    pub fn dedicated(size: usize) -> Result<Self> {
        Self::allocate(size, StorageKind::Dedicated)
    }

    /// Allocate a pool slab of `size` bytes.
    pub fn slab(size: usize) -> Result<Self> {
        Self::allocate(size, StorageKind::Pooled)
    }

    /// Take ownership of an existing vector without copying.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::from_boxed(data.into_boxed_slice(), StorageKind::Dedicated)
    }

    fn allocate(size: usize, kind: StorageKind) -> Result<Self> {
        // Safe Rust cannot hand out uninitialised bytes, so every block starts
        // zeroed. Callers of "unsafe" allocations must still not rely on it.
        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|e| {
            tracing::warn!(size, kind = %kind, "heap allocation failed: {}", e);
            Error::AllocationFailed(format!("cannot allocate {size} bytes: {e}"))
        })?;
        data.resize(size, 0);
        Ok(Self::from_boxed(data.into_boxed_slice(), kind))
    }

    fn from_boxed(data: Box<[u8]>, kind: StorageKind) -> Self {
        let len = data.len();
        let raw = Box::into_raw(data);
        // SAFETY: Box::into_raw never returns null.
        let ptr = unsafe { NonNull::new_unchecked(raw.cast::<u8>()) };
        Self { ptr, len, kind }
    }
}

unsafe impl StorageBlock for HeapBlock {
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
        self.kind
    }
}

impl Drop for HeapBlock {
    fn drop(&mut self) {
        // SAFETY: ptr/len came from Box::into_raw in from_boxed and are freed once.
        unsafe {
            drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.len,
            )));
        }
    }
}

// SAFETY: HeapBlock owns its allocation exclusively; after construction the
// bytes are only touched through atomic byte operations.
unsafe impl Send for HeapBlock {}
unsafe impl Sync for HeapBlock {}
