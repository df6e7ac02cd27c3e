//! `indexOf`, `lastIndexOf` and `includes`.

use super::Buffer;
use crate::encoding::{self, Encoding};
use std::borrow::Cow;

/// What to search for.
#[derive(Debug, Clone)]
pub enum Needle<'a> {
    /// A single byte.
    Byte(u8),
    /// A byte sequence.
    Bytes(Cow<'a, [u8]>),
    /// Text, encoded before searching.
    Text(&'a str, Encoding),
}

impl From<u8> for Needle<'_> {
    fn from(value: u8) -> Self {
        Needle::Byte(value)
    }
}

impl<'a> From<&'a [u8]> for Needle<'a> {
    fn from(value: &'a [u8]) -> Self {
        Needle::Bytes(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a str> for Needle<'a> {
    fn from(value: &'a str) -> Self {
        Needle::Text(value, Encoding::Utf8)
    }
}

impl From<&Buffer> for Needle<'_> {
    fn from(value: &Buffer) -> Self {
        Needle::Bytes(Cow::Owned(value.to_vec()))
    }
}

impl Needle<'_> {
    fn bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Needle::Byte(b) => Cow::Owned(vec![*b]),
            Needle::Bytes(bytes) => Cow::Borrowed(bytes.as_ref()),
            Needle::Text(text, encoding) => Cow::Owned(encoding::decode(text, *encoding)),
        }
    }
}

impl Buffer {
    /// First position at or after `byte_offset` where `needle` occurs
    /// (`buf.indexOf`).
    ///
    /// A negative `byte_offset` counts from the end. An empty needle is
    /// found at `byte_offset` clamped to the length.
    pub fn index_of<'a>(&self, needle: impl Into<Needle<'a>>, byte_offset: isize) -> Option<usize> {
        let needle = needle.into();
        let needle = needle.bytes();
        let haystack = self.to_vec();
        let len = haystack.len();

        let start = if byte_offset < 0 {
            len.saturating_sub(byte_offset.unsigned_abs())
        } else {
            byte_offset as usize
        };

        if needle.is_empty() {
            return Some(start.min(len));
        }
        if start >= len {
            return None;
        }
        haystack[start..]
            .windows(needle.len())
            .position(|window| window == needle.as_ref())
            .map(|pos| pos + start)
    }

    /// Last position at or before `byte_offset` where `needle` starts
    /// (`buf.lastIndexOf`).
    ///
    /// `None` as offset searches from the end. A negative offset counts from
    /// the end; one that lands before the start finds nothing, except for an
    /// empty needle, which is found at 0.
    pub fn last_index_of<'a>(&self, needle: impl Into<Needle<'a>>, byte_offset: Option<isize>) -> Option<usize> {
        let needle = needle.into();
        let needle = needle.bytes();
        let haystack = self.to_vec();
        let len = haystack.len();

        let start = match byte_offset {
            None => Some(len),
            Some(offset) if offset < 0 => len.checked_sub(offset.unsigned_abs()),
            Some(offset) => Some(offset as usize),
        };

        if needle.is_empty() {
            return Some(start.map_or(0, |start| start.min(len)));
        }
        let start = start?;
        let last = start.min(len.checked_sub(needle.len())?);
        (0..=last).rev().find(|&i| haystack[i..i + needle.len()] == *needle)
    }

    /// Does `needle` occur at or after `byte_offset` (`buf.includes`)?
    pub fn includes<'a>(&self, needle: impl Into<Needle<'a>>, byte_offset: isize) -> bool {
        self.index_of(needle, byte_offset).is_some()
    }
}
