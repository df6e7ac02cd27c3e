//! In-place mutators and comparisons.

use super::{Buffer, relative_index};
use crate::error::{Error, Result};
use std::cmp::Ordering;

impl Buffer {
    /// Same bytes in the same order (`buf.equals`).
    pub fn equals(&self, other: &Buffer) -> bool {
        self.len == other.len && self.to_vec() == other.to_vec()
    }

    /// Lexicographic comparison of the contents (`Buffer.compare`).
    pub fn compare(&self, other: &Buffer) -> Ordering {
        self.to_vec().cmp(&other.to_vec())
    }

    /// Compare `self[source_start..source_end]` with
    /// `target[target_start..target_end]` (`buf.compare(target, ...)`).
    ///
    /// Ends default to the respective lengths. An empty source range sorts
    /// before any non-empty target range.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if an end lies past its buffer, or a start does
    /// when the ranges are not empty.
    pub fn compare_range(
        &self,
        target: &Buffer,
        target_start: usize,
        target_end: Option<usize>,
        source_start: usize,
        source_end: Option<usize>,
    ) -> Result<Ordering> {
        let target_end = check_end("targetEnd", target_end, target.len)?;
        let source_end = check_end("sourceEnd", source_end, self.len)?;

        if source_start >= source_end {
            return Ok(if target_start >= target_end { Ordering::Equal } else { Ordering::Less });
        }
        if target_start >= target_end {
            return Ok(Ordering::Greater);
        }
        check_start("targetStart", target_start, target.len)?;
        check_start("sourceStart", source_start, self.len)?;

        let source = self.range_to_vec(source_start, source_end);
        let target = target.range_to_vec(target_start, target_end);
        Ok(source.cmp(&target))
    }

    /// Copy `self[source_start..source_end]` into `target` at
    /// `target_start` and return the number of bytes copied (`buf.copy`).
    ///
    /// The copy is truncated to what fits in both buffers. Overlapping
    /// views copy as if through an intermediate buffer.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `source_start` lies past the end of the
    /// source, even when nothing would be copied.
    pub fn copy(
        &self,
        target: &Buffer,
        target_start: usize,
        source_start: usize,
        source_end: Option<usize>,
    ) -> Result<usize> {
        if source_start > self.len {
            return Err(Error::out_of_range(
                "sourceStart",
                format!(">= 0 && <= {}", self.len),
                source_start,
            ));
        }
        let source_end = source_end.unwrap_or(self.len);
        if target_start >= target.len || source_start >= source_end {
            return Ok(0);
        }

        let count = (source_end - source_start)
            .min(target.len - target_start)
            .min(self.len - source_start);
        if count == 0 {
            return Ok(0);
        }
        let bytes = self.range_to_vec(source_start, source_start + count);
        target.store(target_start, &bytes);
        Ok(count)
    }

    /// Copy `[start, end)` to `target` within the same view
    /// (`TypedArray.prototype.copyWithin`).
    ///
    /// Positions are relative and clamped like [`subarray`](Self::subarray).
    pub fn copy_within(&self, target: isize, start: isize, end: Option<isize>) {
        let target = relative_index(target, self.len);
        let start = relative_index(start, self.len);
        let end = end.map_or(self.len, |end| relative_index(end, self.len));

        let count = end.saturating_sub(start).min(self.len - target);
        if count > 0 {
            let bytes = self.range_to_vec(start, start + count);
            self.store(target, &bytes);
        }
    }

    /// Reverse the bytes in place.
    pub fn reverse(&self) {
        let mut bytes = self.to_vec();
        bytes.reverse();
        self.store(0, &bytes);
    }

    /// Swap the byte order of every 16-bit word (`buf.swap16`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBufferSize`] unless the length is a multiple of 2.
    pub fn swap16(&self) -> Result<()> {
        self.swap_words(2)
    }

    /// Swap the byte order of every 32-bit word (`buf.swap32`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBufferSize`] unless the length is a multiple of 4.
    pub fn swap32(&self) -> Result<()> {
        self.swap_words(4)
    }

    /// Swap the byte order of every 64-bit word (`buf.swap64`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBufferSize`] unless the length is a multiple of 8.
    pub fn swap64(&self) -> Result<()> {
        self.swap_words(8)
    }

    fn swap_words(&self, width: usize) -> Result<()> {
        if self.len % width != 0 {
            return Err(Error::InvalidBufferSize(width * 8));
        }
        let mut bytes = self.to_vec();
        for word in bytes.chunks_exact_mut(width) {
            word.reverse();
        }
        self.store(0, &bytes);
        Ok(())
    }
}

fn check_end(name: &'static str, end: Option<usize>, len: usize) -> Result<usize> {
    match end {
        None => Ok(len),
        Some(end) if end <= len => Ok(end),
        Some(end) => Err(Error::out_of_range(name, format!(">= 0 && <= {len}"), end)),
    }
}

fn check_start(name: &'static str, start: usize, len: usize) -> Result<()> {
    if start > len {
        return Err(Error::out_of_range(name, format!(">= 0 && <= {len}"), start));
    }
    Ok(())
}
