//! Memory management for node-buffer.
//!
//! This module provides the storage layer every [`Buffer`](crate::Buffer)
//! view sits on.
//!
//! # Architecture
//!
//! - [`StorageBlock`]: Trait for the memory backends (heap, mapping, external)
//! - [`StorageArena`]: Picks pooled, dedicated or mapped storage per request
//! - [`ArrayBuffer`]: A whole block, shared by every view carved from it
//!
//! # Example
//!
//! ```rust
//! use node_buffer::memory::{StorageArena, StorageKind};
//!
//! let arena = StorageArena::global();
//!
//! // Small unsafe allocations come from the shared pool
//! let buf = arena.alloc_unsafe(16).unwrap();
//! assert_eq!(buf.kind(), StorageKind::Pooled);
//!
//! // The block is released when the last view is dropped
//! drop(buf);
//! ```

mod arena;
mod block;
pub mod defaults;
mod external;
mod heap;
mod mapped;
mod stats;

pub use arena::{AllocStrategy, StorageArena};
pub use block::{ArrayBuffer, StorageBlock, StorageKind};
pub use external::ExternalBlock;
pub use heap::HeapBlock;
pub use mapped::MappedBlock;
pub use stats::ArenaStats;
