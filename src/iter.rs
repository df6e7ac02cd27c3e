//! Iteration over a buffer's indices, bytes and `(index, byte)` pairs.
//!
//! The iterators are lazy and independent: each holds its own position and
//! its own handle on the storage, and reads the live byte when it is
//! produced. Writes made through any alias before a byte is reached are
//! observed.
//!
//! ```rust
//! use node_buffer::Buffer;
//!
//! let buf = Buffer::from_bytes(&[10, 20, 30]).unwrap();
//! let mut values = buf.values();
//! assert_eq!(values.next(), Some(10));
//!
//! buf.put(1, 99);
//! assert_eq!(values.next(), Some(99));
//!
//! let entries: Vec<_> = buf.entries().collect();
//! assert_eq!(entries, vec![(0, 10), (1, 99), (2, 30)]);
//! ```

use crate::buffer::Buffer;
use std::iter::FusedIterator;
use std::ops::Range;

/// Iterator over the valid indices (`buf.keys()`).
#[derive(Debug, Clone)]
pub struct Keys {
    range: Range<usize>,
}

impl Iterator for Keys {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.range.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for Keys {}
impl FusedIterator for Keys {}

/// Iterator over the bytes (`buf.values()`).
#[derive(Debug, Clone)]
pub struct Values {
    buffer: Buffer,
    pos: usize,
}

impl Iterator for Values {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let byte = self.buffer.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Values {}
impl FusedIterator for Values {}

/// Iterator over `(index, byte)` pairs (`buf.entries()`).
#[derive(Debug, Clone)]
pub struct Entries {
    buffer: Buffer,
    pos: usize,
}

impl Iterator for Entries {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<(usize, u8)> {
        let byte = self.buffer.get(self.pos)?;
        let index = self.pos;
        self.pos += 1;
        Some((index, byte))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Entries {}
impl FusedIterator for Entries {}

impl Buffer {
    /// Indices `0..len`.
    pub fn keys(&self) -> Keys {
        Keys { range: 0..self.len() }
    }

    /// The bytes, read lazily.
    pub fn values(&self) -> Values {
        Values {
            buffer: self.clone(),
            pos: 0,
        }
    }

    /// `(index, byte)` pairs, read lazily.
    pub fn entries(&self) -> Entries {
        Entries {
            buffer: self.clone(),
            pos: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        let buf = Buffer::alloc(3).unwrap();
        assert_eq!(buf.keys().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(buf.keys().len(), 3);
        assert_eq!(Buffer::alloc(0).unwrap().keys().next(), None);
    }

    #[test]
    fn test_iterators_are_independent() {
        let buf = Buffer::from_bytes(&[1, 2, 3]).unwrap();
        let mut a = buf.values();
        let mut b = buf.values();

        assert_eq!(a.next(), Some(1));
        assert_eq!(a.next(), Some(2));
        assert_eq!(b.next(), Some(1));
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_values_are_live() {
        let buf = Buffer::from_bytes(&[1, 2, 3]).unwrap();
        let mut entries = buf.entries();
        assert_eq!(entries.next(), Some((0, 1)));

        buf.slice(2, None).put(0, 42);
        assert_eq!(entries.next(), Some((1, 2)));
        assert_eq!(entries.next(), Some((2, 42)));
        assert_eq!(entries.next(), None);
        assert_eq!(entries.next(), None);
    }

    #[test]
    fn test_into_iterator() {
        let buf = Buffer::from_bytes(&[4, 5]).unwrap();
        let mut total = 0u32;
        for byte in &buf {
            total += u32::from(byte);
        }
        assert_eq!(total, 9);
        assert_eq!(buf.values().map(u32::from).sum::<u32>(), 9);
    }
}
