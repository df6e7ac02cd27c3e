//! Default sizes, limits and configuration keys.
//!
//! The pool and length limits mirror the values Node.js ships with on 64-bit
//! platforms so that byte offsets of pooled buffers line up exactly.
//!
//! # Usage
//!
//! ```rust
//! use node_buffer::memory::defaults;
//!
//! // Requests strictly below half the pool size are carved out of a slab.
//! assert_eq!(defaults::POOL_SIZE >> 1, 4096);
//! ```

// =============================================================================
// Pool
// =============================================================================

/// Default slab size for pooled allocations (`Buffer.poolSize`).
pub const POOL_SIZE: usize = 8 * 1024;

/// Pooled slices start on this boundary inside a slab.
pub const POOL_ALIGNMENT: usize = 8;

// =============================================================================
// Mapping
// =============================================================================

/// Allocations at or above this size are backed by an anonymous mapping.
pub const MMAP_THRESHOLD: usize = 32 * 1024 * 1024;

// =============================================================================
// Limits
// =============================================================================

/// Largest buffer length accepted (`buffer.constants.MAX_LENGTH`, 2^53 - 1).
pub const MAX_LENGTH: usize = (1 << 53) - 1;

/// Largest string length the host engine can represent
/// (`buffer.constants.MAX_STRING_LENGTH`).
pub const MAX_STRING_LENGTH: usize = (1 << 29) - 24;

/// Number of bytes printed by the `Debug` rendering of a buffer.
pub const INSPECT_MAX_BYTES: usize = 50;

// =============================================================================
// Environment
// =============================================================================

/// Overrides [`POOL_SIZE`] for the process-wide arena.
pub const ENV_POOL_SIZE: &str = "NODE_BUFFER_POOL_SIZE";

/// Overrides [`MMAP_THRESHOLD`] for the process-wide arena.
pub const ENV_MMAP_THRESHOLD: &str = "NODE_BUFFER_MMAP_THRESHOLD";

/// Selects the encoding policy (`lenient` or `strict`).
pub const ENV_ENCODING_POLICY: &str = "NODE_BUFFER_ENCODING_POLICY";
