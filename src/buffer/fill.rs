//! `buf.fill` and `Buffer.alloc(size, fill)`.

use super::Buffer;
use crate::encoding::{self, Encoding};
use crate::error::{Error, Result};
use crate::value::uint8_from_number;
use std::borrow::Cow;

/// A fill pattern.
#[derive(Debug, Clone)]
pub enum FillValue<'a> {
    /// A number, reduced to a byte like an index store.
    Number(f64),
    /// Text, encoded before filling. The empty string fills with zeroes.
    Text(&'a str, Encoding),
    /// A byte pattern, repeated.
    Bytes(Cow<'a, [u8]>),
}

impl From<u8> for FillValue<'_> {
    fn from(value: u8) -> Self {
        FillValue::Number(value.into())
    }
}

impl From<i32> for FillValue<'_> {
    fn from(value: i32) -> Self {
        FillValue::Number(value.into())
    }
}

impl From<f64> for FillValue<'_> {
    fn from(value: f64) -> Self {
        FillValue::Number(value)
    }
}

impl<'a> From<&'a str> for FillValue<'a> {
    fn from(value: &'a str) -> Self {
        FillValue::Text(value, Encoding::Utf8)
    }
}

impl<'a> From<&'a [u8]> for FillValue<'a> {
    fn from(value: &'a [u8]) -> Self {
        FillValue::Bytes(Cow::Borrowed(value))
    }
}

impl From<&Buffer> for FillValue<'_> {
    fn from(value: &Buffer) -> Self {
        FillValue::Bytes(Cow::Owned(value.to_vec()))
    }
}

impl FillValue<'_> {
    /// The byte pattern to repeat.
    fn pattern(&self) -> Result<Cow<'_, [u8]>> {
        let pattern = match self {
            FillValue::Number(n) => Cow::Owned(vec![uint8_from_number(*n)]),
            FillValue::Text("", _) => Cow::Owned(vec![0]),
            FillValue::Text(text, encoding) => Cow::Owned(encoding::decode(text, *encoding)),
            FillValue::Bytes(bytes) => Cow::Borrowed(bytes.as_ref()),
        };
        if pattern.is_empty() {
            return Err(Error::InvalidArgValue {
                name: "value",
                received: self.describe(),
            });
        }
        Ok(pattern)
    }

    fn describe(&self) -> String {
        match self {
            FillValue::Number(n) => crate::error::format_number(*n),
            FillValue::Text(text, _) => format!("'{text}'"),
            // only an empty pattern is ever rejected
            FillValue::Bytes(_) => "<Buffer >".to_string(),
        }
    }
}

impl Buffer {
    /// Buffer of `size` bytes filled with `fill` (`Buffer.alloc(size, fill)`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgValue`] if the fill value encodes to no bytes.
    pub fn alloc_filled<'a>(size: usize, fill: impl Into<FillValue<'a>>) -> Result<Self> {
        let fill = fill.into();
        if size == 0 {
            return Self::alloc(0);
        }
        let buf = Self::alloc_unsafe_slow(size)?;
        buf.fill(fill)?;
        Ok(buf)
    }

    /// Fill the whole view with `value` (`buf.fill(value)`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgValue`] if the value encodes to no bytes.
    pub fn fill<'a>(&self, value: impl Into<FillValue<'a>>) -> Result<()> {
        self.fill_range(value, 0, None)
    }

    /// Fill `[offset, end)` with `value`, repeating the pattern and
    /// truncating its last repetition (`buf.fill(value, offset, end)`).
    ///
    /// An empty range is a no-op.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfRange`] if `end` lies past the view
    /// - [`Error::InvalidArgValue`] if the value encodes to no bytes
    pub fn fill_range<'a>(&self, value: impl Into<FillValue<'a>>, offset: usize, end: Option<usize>) -> Result<()> {
        let value = value.into();
        let end = match end {
            None => self.len,
            Some(end) if end <= self.len => end,
            Some(end) => {
                return Err(Error::out_of_range("end", format!(">= 0 && <= {}", self.len), end));
            }
        };
        if offset >= end {
            return Ok(());
        }

        let pattern = value.pattern()?;
        let filled: Vec<u8> = pattern.iter().copied().cycle().take(end - offset).collect();
        self.store(offset, &filled);
        Ok(())
    }
}
