//! Storage arena: the allocator behind every buffer.
//!
//! The arena decides, per request, where the bytes of a new buffer live:
//!
//! - **Pooled**: small requests (`size < pool_size / 2`) are carved out of a
//!   shared slab, 8-byte aligned, so that many tiny buffers cost one heap
//!   allocation. Slab space is never handed out twice; a slab is freed once
//!   the arena has moved on and every view into it is gone.
//! - **Dedicated**: anything else below the mapping threshold, and every
//!   explicit "slow" or zeroed request, gets its own heap block.
//! - **Mapped**: requests of at least `mmap_threshold` bytes are backed by an
//!   anonymous mapping that is unmapped when the last view is dropped.
//!
//! # Memory Layout
//!
//! ```text
//! slab (pool_size bytes)
//! ┌────────┬───┬──────────────┬─┬────────┬──────────────────────┐
//! │ buf A  │pad│    buf B     │p│ buf C  │   free (cursor →)    │
//! └────────┴───┴──────────────┴─┴────────┴──────────────────────┘
//! ^ byte_offset(A) = 0   ^ byte_offset(B) = align8(len A)
//! ```
//!
//! # Example
//!
//! ```rust
//! use node_buffer::config::BufferConfig;
//! use node_buffer::memory::{AllocStrategy, StorageArena, StorageKind};
//!
//! let arena = StorageArena::new(BufferConfig::default()).unwrap();
//!
//! let small = arena.allocate(16, AllocStrategy::Default).unwrap();
//! assert_eq!(small.kind(), StorageKind::Pooled);
//!
//! let slow = arena.allocate(16, AllocStrategy::Dedicated).unwrap();
//! assert_eq!(slow.kind(), StorageKind::Dedicated);
//! ```

use super::defaults::{MAX_LENGTH, POOL_ALIGNMENT};
use super::{ArenaStats, HeapBlock, MappedBlock, StorageBlock, StorageKind};
use crate::buffer::Buffer;
use crate::config::{BufferConfig, EncodingPolicy};
use crate::encoding::{self, Encoding};
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Process-wide arena used by the `Buffer::*` constructors.
static GLOBAL_ARENA: OnceLock<StorageArena> = OnceLock::new();

/// How the caller wants a new buffer allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AllocStrategy {
    /// Let the arena pick: pooled when small, dedicated otherwise
    /// (`Buffer.allocUnsafe`). Contents are unspecified.
    #[default]
    Default,
    /// Always a standalone block (`Buffer.allocUnsafeSlow`). Contents are
    /// unspecified.
    Dedicated,
    /// A standalone block guaranteed to be all zeroes (`Buffer.alloc`).
    Zeroed,
}

/// Current slab and the next free offset inside it.
#[derive(Default)]
struct PoolCursor {
    slab: Option<Arc<HeapBlock>>,
    offset: usize,
}

/// Allocator that chooses pooled, dedicated or mapped storage per request.
pub struct StorageArena {
    /// Slab size for new pool slabs. Mutable at runtime.
    pool_size: AtomicUsize,
    /// Minimum size for mapped allocations.
    mmap_threshold: usize,
    /// How unknown encoding names are treated.
    encoding_policy: EncodingPolicy,
    /// The slab currently being carved.
    pool: Mutex<PoolCursor>,
    /// Allocation counters, shared with mapped blocks.
    stats: Arc<ArenaStats>,
}

impl StorageArena {
    /// Create an arena with the given configuration.
    pub fn new(config: BufferConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: BufferConfig) -> Self {
        Self {
            pool_size: AtomicUsize::new(config.pool_size),
            mmap_threshold: config.mmap_threshold,
            encoding_policy: config.encoding_policy,
            pool: Mutex::new(PoolCursor::default()),
            stats: Arc::new(ArenaStats::new()),
        }
    }

    /// The process-wide arena, configured from the environment on first use.
    ///
    /// An unusable environment configuration is logged and replaced by the
    /// defaults.
    pub fn global() -> &'static StorageArena {
        GLOBAL_ARENA.get_or_init(|| {
            let config = BufferConfig::from_env().unwrap_or_else(|e| {
                tracing::warn!("ignoring buffer configuration from environment: {}", e);
                BufferConfig::default()
            });
            Self::from_config(config)
        })
    }

    /// Allocate a buffer of `size` bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSize`] if `size` exceeds `MAX_LENGTH`
    /// - [`Error::AllocationFailed`] / [`Error::System`] if memory cannot be
    ///   obtained
    pub fn allocate(&self, size: usize, strategy: AllocStrategy) -> Result<Buffer> {
        if size > MAX_LENGTH {
            return Err(Error::InvalidSize(size.to_string()));
        }

        if size >= self.mmap_threshold {
            return self.allocate_mapped(size);
        }

        let pool_size = self.pool_size();
        match strategy {
            AllocStrategy::Default if size > 0 && size < pool_size >> 1 => {
                self.allocate_pooled(size, pool_size)
            }
            _ => self.allocate_dedicated(size),
        }
    }

    /// Zero-filled buffer (`Buffer.alloc`).
    pub fn alloc(&self, size: usize) -> Result<Buffer> {
        self.allocate(size, AllocStrategy::Zeroed)
    }

    /// Possibly pooled buffer with unspecified contents (`Buffer.allocUnsafe`).
    pub fn alloc_unsafe(&self, size: usize) -> Result<Buffer> {
        self.allocate(size, AllocStrategy::Default)
    }

    /// Standalone buffer with unspecified contents (`Buffer.allocUnsafeSlow`).
    pub fn alloc_unsafe_slow(&self, size: usize) -> Result<Buffer> {
        self.allocate(size, AllocStrategy::Dedicated)
    }

    /// New buffer holding a copy of `bytes`.
    pub fn copy_from_slice(&self, bytes: &[u8]) -> Result<Buffer> {
        let buffer = self.alloc_unsafe(bytes.len())?;
        buffer.set(bytes, 0)?;
        Ok(buffer)
    }

    /// New buffer holding `text` encoded with `encoding`.
    pub fn from_string(&self, text: &str, encoding: Encoding) -> Result<Buffer> {
        self.copy_from_slice(&encoding::decode(text, encoding))
    }

    /// Current pool slab size.
    pub fn pool_size(&self) -> usize {
        self.pool_size.load(Ordering::Relaxed)
    }

    /// Change the pool slab size.
    ///
    /// Takes effect for the next slab; buffers already handed out, and the
    /// slab currently being carved, are untouched.
    pub fn set_pool_size(&self, pool_size: usize) {
        let previous = self.pool_size.swap(pool_size, Ordering::Relaxed);
        tracing::debug!(previous, pool_size, "pool size changed");
    }

    /// Minimum size of a mapped allocation.
    pub fn mmap_threshold(&self) -> usize {
        self.mmap_threshold
    }

    /// Configured encoding policy.
    pub fn encoding_policy(&self) -> EncodingPolicy {
        self.encoding_policy
    }

    /// Resolve an encoding name under this arena's policy.
    pub fn resolve_encoding(&self, name: &str) -> Result<Encoding> {
        Encoding::resolve(name, self.encoding_policy)
    }

    /// Allocation statistics.
    pub fn stats(&self) -> &ArenaStats {
        &self.stats
    }

    /// `pool_size` is the value the threshold check saw; a concurrent
    /// `set_pool_size` must not shrink the slab below `size`.
    fn allocate_pooled(&self, size: usize, pool_size: usize) -> Result<Buffer> {
        let slab_size = pool_size.max(size);
        let mut pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner);

        let fits = pool
            .slab
            .as_ref()
            .is_some_and(|slab| slab.len().saturating_sub(pool.offset) >= size);

        let reused = if fits { pool.slab.clone() } else { None };
        let slab = match reused {
            Some(slab) => slab,
            None => {
                let slab = Arc::new(HeapBlock::slab(slab_size)?);
                self.stats.record_slab(slab_size);
                tracing::debug!(slab_size, "created pool slab");
                pool.slab = Some(Arc::clone(&slab));
                pool.offset = 0;
                slab
            }
        };

        let offset = pool.offset;
        pool.offset = align_pool(offset + size).min(slab.len());
        drop(pool);

        self.stats.record_allocation(StorageKind::Pooled, size);
        let block: Arc<dyn StorageBlock> = slab;
        Ok(Buffer::from_parts(block, offset, size))
    }

    fn allocate_dedicated(&self, size: usize) -> Result<Buffer> {
        let block = HeapBlock::dedicated(size)?;
        self.stats.record_allocation(StorageKind::Dedicated, size);
        Ok(Buffer::from_parts(Arc::new(block), 0, size))
    }

    fn allocate_mapped(&self, size: usize) -> Result<Buffer> {
        let block = MappedBlock::with_stats(size, Arc::clone(&self.stats))?;
        self.stats.record_allocation(StorageKind::Mapped, size);
        Ok(Buffer::from_parts(Arc::new(block), 0, size))
    }
}

impl std::fmt::Debug for StorageArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageArena")
            .field("pool_size", &self.pool_size())
            .field("mmap_threshold", &self.mmap_threshold)
            .field("encoding_policy", &self.encoding_policy)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Round a pool offset up to the next slice boundary.
#[inline]
fn align_pool(offset: usize) -> usize {
    offset.next_multiple_of(POOL_ALIGNMENT)
}
