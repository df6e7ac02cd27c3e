//! Text conversion: `buf.toString(encoding, start, end)` and `buf.write(string, ...)`.

use super::Buffer;
use crate::encoding::{self, Encoding};
use crate::error::{Error, Result};

impl Buffer {
    /// Decode the whole view with `encoding`.
    pub fn to_string_with(&self, encoding: Encoding) -> String {
        encoding::encode(&self.to_vec(), encoding)
    }

    /// Decode `[start, end)` with `encoding`.
    ///
    /// `end` defaults to the length; both ends are clamped and an empty or
    /// inverted range yields an empty string.
    pub fn to_string_range(&self, encoding: Encoding, start: usize, end: Option<usize>) -> String {
        let end = end.map_or(self.len, |end| end.min(self.len));
        if start >= end {
            return String::new();
        }
        encoding::encode(&self.range_to_vec(start, end), encoding)
    }

    /// Encode `text` into the view at `offset`, writing at most `length`
    /// bytes, and return the number of bytes written (`buf.write`).
    ///
    /// Only whole characters are written for utf8 and only whole code units
    /// for utf16le; other encodings are truncated at the byte limit.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `offset` or `length` exceed the view.
    pub fn write_string(&self, text: &str, offset: usize, length: Option<usize>, encoding: Encoding) -> Result<usize> {
        if offset > self.len {
            return Err(Error::out_of_range("offset", format!(">= 0 && <= {}", self.len), offset));
        }
        let remaining = self.len - offset;
        let limit = match length {
            None => remaining,
            Some(length) if length > self.len => {
                return Err(Error::out_of_range("length", format!(">= 0 && <= {}", self.len), length));
            }
            Some(length) => length.min(remaining),
        };

        let count = match encoding {
            Encoding::Utf8 => {
                let count = utf8_prefix_len(text, limit);
                self.store(offset, &text.as_bytes()[..count]);
                count
            }
            _ => {
                let bytes = encoding::decode(text, encoding);
                let mut count = bytes.len().min(limit);
                if encoding == Encoding::Utf16Le {
                    count &= !1;
                }
                self.store(offset, &bytes[..count]);
                count
            }
        };
        Ok(count)
    }
}

/// Longest prefix of `text` that ends on a character boundary and fits in
/// `limit` bytes.
fn utf8_prefix_len(text: &str, limit: usize) -> usize {
    if text.len() <= limit {
        return text.len();
    }
    (0..=limit).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string_range() {
        let buf = Buffer::from_string("hello world", Encoding::Utf8).unwrap();
        assert_eq!(buf.to_string_range(Encoding::Utf8, 6, None), "world");
        assert_eq!(buf.to_string_range(Encoding::Utf8, 0, Some(5)), "hello");
        assert_eq!(buf.to_string_range(Encoding::Utf8, 6, Some(100)), "world");
        assert_eq!(buf.to_string_range(Encoding::Utf8, 8, Some(2)), "");
        assert_eq!(buf.to_string_range(Encoding::Hex, 0, Some(2)), "6865");
        assert_eq!(buf.to_string_range(Encoding::Utf8, 50, None), "");
    }

    #[test]
    fn test_to_string_with() {
        let buf = Buffer::from_bytes(&[0xfb, 0xff]).unwrap();
        assert_eq!(buf.to_string_with(Encoding::Base64), "+/8=");
        assert_eq!(buf.to_string_with(Encoding::Base64Url), "-_8");
        assert_eq!(buf.to_string_with(Encoding::Latin1), "ûÿ");
    }

    #[test]
    fn test_write_string() {
        let buf = Buffer::alloc(8).unwrap();
        assert_eq!(buf.write_string("hi", 0, None, Encoding::Utf8).unwrap(), 2);
        assert_eq!(buf.write_string("ff00", 2, None, Encoding::Hex).unwrap(), 2);
        assert_eq!(buf.to_vec()[..4], [b'h', b'i', 0xff, 0]);

        assert_eq!(buf.write_string("abcdef", 6, None, Encoding::Latin1).unwrap(), 2);
        assert_eq!(buf.write_string("abcdef", 0, Some(3), Encoding::Ascii).unwrap(), 3);
        assert_eq!(buf.write_string("", 8, None, Encoding::Utf8).unwrap(), 0);
    }

    #[test]
    fn test_write_string_whole_characters() {
        let buf = Buffer::alloc(4).unwrap();
        assert_eq!(buf.write_string("a€", 0, None, Encoding::Utf8).unwrap(), 4);

        let buf = Buffer::alloc(3).unwrap();
        assert_eq!(buf.write_string("a€", 0, None, Encoding::Utf8).unwrap(), 1);
        assert_eq!(buf.to_vec(), vec![b'a', 0, 0]);

        assert_eq!(buf.write_string("abc", 0, None, Encoding::Utf16Le).unwrap(), 2);
        assert_eq!(buf.to_vec(), vec![b'a', 0, 0]);
    }

    #[test]
    fn test_write_string_errors() {
        let buf = Buffer::alloc(4).unwrap();
        let err = buf.write_string("x", 5, None, Encoding::Utf8).unwrap_err();
        assert!(err.to_string().contains("\"offset\""));
        let err = buf.write_string("x", 0, Some(5), Encoding::Utf8).unwrap_err();
        assert!(err.to_string().contains("\"length\""));
        assert_eq!(buf.write_string("xyz", 2, Some(4), Encoding::Utf8).unwrap(), 2);
    }
}
