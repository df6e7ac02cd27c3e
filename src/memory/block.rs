//! Storage block trait and types.

use std::sync::Arc;

/// How the memory behind a block was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKind {
    /// A shared slab that small allocations are carved out of.
    Pooled,
    /// A standalone heap allocation ("slow" buffers and anything above the
    /// pool threshold).
    Dedicated,
    /// An anonymous memory mapping, used for very large allocations.
    Mapped,
    /// Memory owned by the embedder and wrapped without copying.
    External,
}

impl StorageKind {
    /// Name used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Pooled => "pooled",
            StorageKind::Dedicated => "dedicated",
            StorageKind::Mapped => "mapped",
            StorageKind::External => "external",
        }
    }

    /// Can several unrelated buffers live inside one block of this kind?
    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self, StorageKind::Pooled)
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for storage backends.
///
/// A storage block is a contiguous, fixed-capacity byte region. Blocks are
/// always handled through `Arc<dyn StorageBlock>`; the strong count of that
/// `Arc` is the block's reference count and the block is released by its
/// `Drop` implementation when the last view goes away.
///
/// # Safety
///
/// Implementations must ensure that:
/// - The pointer stays valid and writable for `len()` bytes for the
///   lifetime of the block
/// - The region is not reachable through any Rust reference held by the
///   implementation itself; views access it only through `AtomicU8` loads
///   and stores over the raw pointer
pub unsafe trait StorageBlock: Send + Sync {
    /// Raw pointer to the first byte of the block.
    fn as_mut_ptr(&self) -> *mut u8;

    /// Capacity of the block in bytes.
    fn len(&self) -> usize;

    /// Returns true if the block has zero capacity.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How the block was allocated.
    fn kind(&self) -> StorageKind;
}

/// A whole storage block, the equivalent of an `ArrayBuffer`.
///
/// Cloning is cheap and aliases the same memory.
#[derive(Clone)]
pub struct ArrayBuffer {
    block: Arc<dyn StorageBlock>,
}

impl ArrayBuffer {
    pub(crate) fn new(block: Arc<dyn StorageBlock>) -> Self {
        Self { block }
    }

    /// Capacity of the underlying block.
    pub fn byte_length(&self) -> usize {
        self.block.len()
    }

    /// Allocation strategy of the underlying block.
    pub fn kind(&self) -> StorageKind {
        self.block.kind()
    }

    /// Do both handles refer to the same block?
    pub fn same_block(&self, other: &ArrayBuffer) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.block), Arc::as_ptr(&other.block))
    }

    /// Number of live handles (views and array buffers) on the block.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.block)
    }

    pub(crate) fn block(&self) -> &Arc<dyn StorageBlock> {
        &self.block
    }
}

impl std::fmt::Debug for ArrayBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayBuffer")
            .field("byte_length", &self.byte_length())
            .field("kind", &self.kind())
            .finish()
    }
}
