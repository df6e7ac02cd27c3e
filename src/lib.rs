//! # node-buffer
//!
//! A Node.js compatible `Buffer` runtime: byte storage for script engines
//! that have to reproduce the exact behaviour of Node's `Buffer` type.
//!
//! Buffers are views onto reference counted storage blocks. Small
//! allocations are carved out of a shared pool, larger ones get a dedicated
//! heap block and very large ones an anonymous memory mapping, which is
//! unmapped exactly once when the last view goes away.
//!
//! ## Features
//!
//! - **Allocation strategies**: pooled, dedicated and mapped storage chosen
//!   per request, with Node's pool threshold and 8-byte pool alignment
//! - **Aliasing views**: `slice` / `subarray` share memory, `from_buffer`
//!   copies, foreign memory can be wrapped without copying
//! - **Encodings**: utf8, utf16le, latin1, ascii, base64, base64url and hex,
//!   including Node's loose decoding rules
//! - **Numeric codec**: every `read*` / `write*` layout with strict offset and
//!   range validation, 64-bit integers without precision loss
//! - **Node error codes**: every error reports its `ERR_*` code
//!
//! ## Quick Start
//!
//! ```rust
//! use node_buffer::prelude::*;
//!
//! let buf = Buffer::alloc(5)?;
//! buf.write_u8(65, 0)?;
//! assert_eq!(buf.to_string_range(Encoding::Hex, 0, Some(1)), "41");
//!
//! let text = Buffer::from_string("48656c6c6f", Encoding::Hex)?;
//! assert_eq!(text.to_string(), "Hello");
//!
//! let sub = text.slice(1, Some(3));
//! sub.put(0, b'a');
//! assert_eq!(text.to_string(), "Hallo");
//! # Ok::<(), node_buffer::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod buffer;
pub mod config;
pub mod encoding;
pub mod error;
pub mod iter;
pub mod memory;
pub mod numeric;
pub mod observability;
pub mod value;

/// Limits exposed as `buffer.constants`.
pub mod constants {
    pub use crate::memory::defaults::{MAX_LENGTH, MAX_STRING_LENGTH};
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::buffer::{Buffer, FillValue, Needle};
    pub use crate::config::{BufferConfig, EncodingPolicy};
    pub use crate::encoding::Encoding;
    pub use crate::error::{Error, Result};
    pub use crate::memory::{AllocStrategy, ArrayBuffer, StorageArena, StorageKind};
    pub use crate::numeric::{Endian, NumericField, NumericValue};
    pub use crate::value::{Value, is_buffer};
}

pub use buffer::Buffer;
pub use error::{Error, Result};
