//! Buffer views over storage blocks.
//!
//! A [`Buffer`] is a window `(block, offset, len)` onto a storage block.
//! Cloning a buffer, slicing it or calling [`Buffer::subarray`] produces
//! another window onto the same bytes; [`Buffer::from_buffer`] copies into a
//! fresh block.
//!
//! ```text
//! block (ArrayBuffer)
//! ┌──────────────────────────────────────────────────────────┐
//! │ .................. bytes ................................ │
//! └──────────────────────────────────────────────────────────┘
//!      ▲ buf (offset 4, len 32)
//!      └──────────┐
//!            ▲ buf.slice(8, 16) (offset 12, len 8)
//! ```
//!
//! # Byte Access
//!
//! Views alias each other and may live on different threads, so no view
//! ever hands out a `&[u8]` into the block. Every read and write is a
//! relaxed `AtomicU8` load or store over the block memory. Concurrent
//! writers never cause undefined behaviour; ordering between threads is
//! whatever the caller establishes.
//!
//! # Example
//!
//! ```rust
//! use node_buffer::Buffer;
//! use node_buffer::encoding::Encoding;
//!
//! let buf = Buffer::from_bytes(&[1, 2, 3, 4, 5]).unwrap();
//! let sub = buf.slice(1, Some(4));
//! sub.put(0, 99);
//! assert_eq!(buf.get(1), Some(99));
//!
//! let buf = Buffer::alloc(5).unwrap();
//! buf.write_u8(65, 0).unwrap();
//! assert_eq!(buf.to_string_range(Encoding::Hex, 0, Some(1)), "41");
//! ```

mod fill;
mod numbers;
mod ops;
mod search;
mod string;

pub use fill::FillValue;
pub use search::Needle;

use crate::encoding::{self, Encoding};
use crate::error::{Error, Result};
use crate::memory::{ArrayBuffer, ExternalBlock, HeapBlock, StorageArena, StorageBlock, StorageKind};
use crate::memory::defaults::INSPECT_MAX_BYTES;
use crate::value::{Value, to_uint8};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::Ordering;
use std::ptr::NonNull;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering as MemOrdering};

/// A Node.js style byte buffer: a view onto shared storage.
///
/// Clones alias the same memory. Equality and ordering compare contents.
#[derive(Clone)]
pub struct Buffer {
    /// The backing block.
    block: Arc<dyn StorageBlock>,
    /// Offset of the first byte within the block.
    offset: usize,
    /// Number of bytes in the view.
    len: usize,
}

impl Buffer {
    pub(crate) fn from_parts(block: Arc<dyn StorageBlock>, offset: usize, len: usize) -> Self {
        debug_assert!(offset + len <= block.len(), "view exceeds block bounds");
        Self { block, offset, len }
    }

    // --- constructors -----------------------------------------------------

    /// Zero-filled buffer of `size` bytes (`Buffer.alloc`).
    pub fn alloc(size: usize) -> Result<Self> {
        StorageArena::global().alloc(size)
    }

    /// Buffer whose contents are unspecified, possibly carved from the
    /// shared pool (`Buffer.allocUnsafe`).
    pub fn alloc_unsafe(size: usize) -> Result<Self> {
        StorageArena::global().alloc_unsafe(size)
    }

    /// Standalone buffer with unspecified contents (`Buffer.allocUnsafeSlow`).
    pub fn alloc_unsafe_slow(size: usize) -> Result<Self> {
        StorageArena::global().alloc_unsafe_slow(size)
    }

    /// Copy of `bytes` in a new buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        StorageArena::global().copy_from_slice(bytes)
    }

    /// Take ownership of `data` without copying.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let len = data.len();
        Self::from_parts(Arc::new(HeapBlock::from_vec(data)), 0, len)
    }

    /// `text` encoded with `encoding`.
    pub fn from_string(text: &str, encoding: Encoding) -> Result<Self> {
        StorageArena::global().from_string(text, encoding)
    }

    /// Copy of another buffer's bytes in a new, unaliased block.
    pub fn from_buffer(source: &Buffer) -> Result<Self> {
        Self::from_bytes(&source.to_vec())
    }

    /// Zero-copy view onto `array_buffer` (`Buffer.from(arrayBuffer, byteOffset, length)`).
    ///
    /// `length` defaults to the rest of the block.
    ///
    /// # Errors
    ///
    /// [`Error::BufferOutOfBounds`] naming `offset` or `length` when the
    /// window does not fit the block.
    pub fn from_array_buffer(array_buffer: &ArrayBuffer, byte_offset: usize, length: Option<usize>) -> Result<Self> {
        let capacity = array_buffer.byte_length();
        if byte_offset > capacity {
            return Err(Error::BufferOutOfBounds(Some("offset")));
        }
        let len = match length {
            Some(len) if len > capacity - byte_offset => {
                return Err(Error::BufferOutOfBounds(Some("length")));
            }
            Some(len) => len,
            None => capacity - byte_offset,
        };
        Ok(Self::from_parts(Arc::clone(array_buffer.block()), byte_offset, len))
    }

    /// Zero-copy view onto memory owned by the embedder.
    ///
    /// `release` runs exactly once, after the last view onto the memory has
    /// been dropped.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` bytes until
    /// `release` is called, and while any view exists the memory must only
    /// be accessed through views.
    pub unsafe fn from_external(ptr: NonNull<u8>, len: usize, release: impl FnOnce() + Send + 'static) -> Self {
        // SAFETY: forwarded from the caller.
        let block = unsafe { ExternalBlock::new(ptr, len, release) };
        Self::from_parts(Arc::new(block), 0, len)
    }

    /// Concatenate `list` into a new buffer (`Buffer.concat`).
    ///
    /// With `total_length` the result has exactly that many bytes: input is
    /// truncated, and any shortfall is zero-filled.
    pub fn concat(list: &[Buffer], total_length: Option<usize>) -> Result<Self> {
        let total = total_length.unwrap_or_else(|| list.iter().map(Buffer::len).sum());
        let result = Self::alloc_unsafe(total)?;

        let mut pos = 0;
        for buf in list {
            if pos >= total {
                break;
            }
            let take = buf.len.min(total - pos);
            let mut chunk = vec![0; take];
            buf.load(0, &mut chunk);
            result.store(pos, &chunk);
            pos += take;
        }
        if pos < total {
            result.store(pos, &vec![0; total - pos]);
        }
        Ok(result)
    }

    // --- statics ----------------------------------------------------------

    /// Bytes `text` occupies in `encoding` (`Buffer.byteLength`).
    pub fn byte_length(text: &str, encoding: Encoding) -> usize {
        encoding::byte_length(text, encoding)
    }

    /// Is `name` a supported encoding (`Buffer.isEncoding`)?
    pub fn is_encoding(name: &str) -> bool {
        Encoding::is_encoding(name)
    }

    /// Pool slab size of the process-wide arena (`Buffer.poolSize`).
    pub fn pool_size() -> usize {
        StorageArena::global().pool_size()
    }

    /// Change the pool slab size of the process-wide arena. Existing
    /// buffers are unaffected.
    pub fn set_pool_size(pool_size: usize) {
        StorageArena::global().set_pool_size(pool_size);
    }

    // --- accessors --------------------------------------------------------

    /// Number of bytes in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the view empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of the view within its block (`buf.byteOffset`).
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.offset
    }

    /// The whole backing block (`buf.buffer`).
    pub fn buffer(&self) -> ArrayBuffer {
        ArrayBuffer::new(Arc::clone(&self.block))
    }

    /// Allocation strategy of the backing block.
    pub fn kind(&self) -> StorageKind {
        self.block.kind()
    }

    /// Do the two views overlap in memory?
    pub fn shares_memory(&self, other: &Buffer) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.block), Arc::as_ptr(&other.block))
            && self.offset < other.offset + other.len
            && other.offset < self.offset + self.len
    }

    /// Raw pointer to the first byte of the view.
    pub fn as_ptr(&self) -> *const u8 {
        self.cells().as_ptr().cast()
    }

    /// Snapshot of the view's bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = vec![0; self.len];
        self.load(0, &mut out);
        out
    }

    // --- index access -----------------------------------------------------

    /// Byte at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.cells().get(index).map(|cell| cell.load(MemOrdering::Relaxed))
    }

    /// Store a host value at `index` with `Uint8Array` coercion
    /// (`buf[index] = value`).
    ///
    /// Out of range indices are ignored.
    pub fn put(&self, index: usize, value: impl Into<Value>) {
        self.put_byte(index, to_uint8(&value.into()));
    }

    /// Store a byte at `index`. Out of range indices are ignored.
    pub fn put_byte(&self, index: usize, byte: u8) {
        if let Some(cell) = self.cells().get(index) {
            cell.store(byte, MemOrdering::Relaxed);
        }
    }

    // --- bulk copy --------------------------------------------------------

    /// Copy `source` into the view at `offset` (`TypedArray.prototype.set`).
    ///
    /// # Errors
    ///
    /// - [`Error::BufferOutOfBounds`] if `source` is longer than the view
    /// - [`Error::OutOfRange`] if it does not fit at `offset`
    pub fn set(&self, source: &[u8], offset: usize) -> Result<()> {
        let Some(last) = self.len.checked_sub(source.len()) else {
            return Err(Error::BufferOutOfBounds(None));
        };
        if offset > last {
            return Err(Error::out_of_range("offset", format!(">= 0 and <= {last}"), offset));
        }
        self.store(offset, source);
        Ok(())
    }

    /// Like [`set`](Self::set) with another buffer as source. Overlapping
    /// views copy as if through an intermediate buffer.
    pub fn set_buffer(&self, source: &Buffer, offset: usize) -> Result<()> {
        self.set(&source.to_vec(), offset)
    }

    // --- views ------------------------------------------------------------

    /// Aliasing view of `[start, end)` (`buf.subarray`).
    ///
    /// Negative positions count from the end; both are clamped to the view.
    pub fn subarray(&self, start: isize, end: Option<isize>) -> Buffer {
        let start = relative_index(start, self.len);
        let end = end.map_or(self.len, |end| relative_index(end, self.len));
        let len = end.saturating_sub(start);
        Self::from_parts(Arc::clone(&self.block), self.offset + start, len)
    }

    /// Same as [`subarray`](Self::subarray): buffer slices alias too.
    pub fn slice(&self, start: isize, end: Option<isize>) -> Buffer {
        self.subarray(start, end)
    }

    // --- internal byte access ---------------------------------------------

    /// The view's bytes as atomic cells.
    fn cells(&self) -> &[AtomicU8] {
        // SAFETY: the Arc keeps the block, and with it `offset + len` valid
        // bytes, alive for as long as `self`. AtomicU8 has the layout of u8
        // and views only ever access block memory through these cells.
        unsafe {
            std::slice::from_raw_parts(
                self.block.as_mut_ptr().add(self.offset).cast::<AtomicU8>(),
                self.len,
            )
        }
    }

    /// Copy `dst.len()` bytes starting at `start` out of the view.
    pub(crate) fn load(&self, start: usize, dst: &mut [u8]) {
        let cells = &self.cells()[start..start + dst.len()];
        for (byte, cell) in dst.iter_mut().zip(cells) {
            *byte = cell.load(MemOrdering::Relaxed);
        }
    }

    /// Copy `src` into the view starting at `start`.
    pub(crate) fn store(&self, start: usize, src: &[u8]) {
        let cells = &self.cells()[start..start + src.len()];
        for (cell, &byte) in cells.iter().zip(src) {
            cell.store(byte, MemOrdering::Relaxed);
        }
    }

    /// Snapshot of `[start, end)`.
    pub(crate) fn range_to_vec(&self, start: usize, end: usize) -> Vec<u8> {
        let mut out = vec![0; end - start];
        self.load(start, &mut out);
        out
    }

    /// Serialize as `{"type":"Buffer","data":[...]}` (`buf.toJSON()`).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "Buffer",
            "data": self.to_vec(),
        })
    }
}

/// Resolve a relative position: negative counts from the end, result
/// clamped to `[0, len]`.
pub(crate) fn relative_index(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        (index as usize).min(len)
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = self.len.min(INSPECT_MAX_BYTES);
        let bytes = self.range_to_vec(0, shown);

        f.write_str("<Buffer")?;
        for byte in &bytes {
            write!(f, " {byte:02x}")?;
        }
        let remaining = self.len - shown;
        if remaining > 0 {
            write!(f, " ... {remaining} more byte{}", if remaining > 1 { "s" } else { "" })?;
        }
        if self.is_empty() {
            f.write_str(" ")?;
        }
        f.write_str(">")
    }
}

/// Decodes the bytes as UTF-8, replacing malformed sequences.
impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_vec()))
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Buffer {}

impl PartialOrd for Buffer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Buffer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<'a> IntoIterator for &'a Buffer {
    type Item = u8;
    type IntoIter = crate::iter::Values;

    fn into_iter(self) -> Self::IntoIter {
        self.values()
    }
}

impl Serialize for Buffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Buffer", 2)?;
        state.serialize_field("type", "Buffer")?;
        state.serialize_field("data", &self.to_vec())?;
        state.end()
    }
}

/// The shape produced by [`Buffer::to_json`].
#[derive(serde::Deserialize)]
struct BufferJson {
    #[serde(rename = "type")]
    kind: String,
    data: Vec<u8>,
}

impl<'de> Deserialize<'de> for Buffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = BufferJson::deserialize(deserializer)?;
        if json.kind != "Buffer" {
            return Err(de::Error::invalid_value(de::Unexpected::Str(&json.kind), &"\"Buffer\""));
        }
        Ok(Buffer::from_vec(json.data))
    }
}
