//! Zero-copy wrapping of memory owned by the embedder.

use super::{StorageBlock, StorageKind};
use std::ptr::NonNull;

type ReleaseFn = Box<dyn FnOnce() + Send>;

/// A storage block over foreign memory, e.g. the backing store of a host
/// engine's typed array.
///
/// The block never frees the memory itself. The release callback passed to
/// [`ExternalBlock::new`] runs exactly once, when the last view is dropped.
pub struct ExternalBlock {
    ptr: NonNull<u8>,
    len: usize,
    release: Option<ReleaseFn>,
}

impl ExternalBlock {
    /// Wrap `len` bytes starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` bytes until
    /// `release` is invoked, and nothing may free it before then.
    pub unsafe fn new(ptr: NonNull<u8>, len: usize, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            ptr,
            len,
            release: Some(Box::new(release)),
        }
    }
}

unsafe impl StorageBlock for ExternalBlock {
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
        StorageKind::External
    }
}

impl Drop for ExternalBlock {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::trace!(len = self.len, "releasing external memory");
            release();
        }
    }
}

// SAFETY: the release callback is only reached through `&mut self` in Drop;
// byte access follows the same contract as every other block.
unsafe impl Send for ExternalBlock {}
unsafe impl Sync for ExternalBlock {}
