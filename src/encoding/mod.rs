//! Text encodings understood by buffers.
//!
//! All codecs are stateless. Naming follows the data direction of
//! `Buffer.from(string, encoding)` / `buf.toString(encoding)`:
//!
//! - [`decode`]: text in a given encoding to bytes
//! - [`encode`]: bytes to text in a given encoding
//! - [`byte_length`]: number of bytes [`decode`] would produce
//!
//! # Supported Encodings
//!
//! | Encoding | Aliases | `byte_length` |
//! |----------|---------|---------------|
//! | utf8 | `utf-8` | UTF-8 length |
//! | utf16le | `utf-16le`, `ucs2`, `ucs-2` | 2 x UTF-16 units |
//! | latin1 | `binary` | UTF-16 units |
//! | ascii | | UTF-16 units |
//! | base64 | | from length and padding |
//! | base64url | | from length and padding |
//! | hex | | UTF-16 units / 2 |
//!
//! # Example
//!
//! ```rust
//! use node_buffer::encoding::{self, Encoding};
//!
//! assert_eq!(encoding::byte_length("48656c6c6f", Encoding::Hex), 5);
//! assert_eq!(encoding::decode("48656c6c6f", Encoding::Hex), b"Hello");
//! assert_eq!(encoding::encode(b"Hello", Encoding::Base64), "SGVsbG8=");
//! ```

mod base64;
mod hex;
mod text;

use crate::config::EncodingPolicy;
use crate::error::{Error, Result};
use std::str::FromStr;

/// A textual encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// Little-endian UTF-16 (`ucs2`).
    Utf16Le,
    /// ISO-8859-1 (`binary`): one byte per UTF-16 code unit.
    Latin1,
    /// 7-bit ASCII.
    Ascii,
    /// Standard base64 with padding.
    Base64,
    /// URL-safe base64 without padding.
    Base64Url,
    /// Lowercase hexadecimal.
    Hex,
}

impl Encoding {
    /// Every supported encoding.
    pub const ALL: [Encoding; 7] = [
        Encoding::Utf8,
        Encoding::Utf16Le,
        Encoding::Latin1,
        Encoding::Ascii,
        Encoding::Base64,
        Encoding::Base64Url,
        Encoding::Hex,
    ];

    /// Look up an encoding by name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        let encoding = match name.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Encoding::Utf8,
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Encoding::Utf16Le,
            "latin1" | "binary" => Encoding::Latin1,
            "ascii" => Encoding::Ascii,
            "base64" => Encoding::Base64,
            "base64url" => Encoding::Base64Url,
            "hex" => Encoding::Hex,
            _ => return None,
        };
        Some(encoding)
    }

    /// Look up an encoding by name, applying `policy` to unknown names.
    ///
    /// An empty name means the default (utf8) under either policy.
    pub fn resolve(name: &str, policy: EncodingPolicy) -> Result<Self> {
        if name.is_empty() {
            return Ok(Encoding::Utf8);
        }
        match (Self::parse(name), policy) {
            (Some(encoding), _) => Ok(encoding),
            (None, EncodingPolicy::Lenient) => {
                tracing::warn!(name, "unknown encoding, falling back to utf8");
                Ok(Encoding::Utf8)
            }
            (None, EncodingPolicy::Strict) => Err(Error::UnknownEncoding(name.to_string())),
        }
    }

    /// Lenient lookup: unknown names become utf8.
    pub fn lookup(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    /// Is `name` a supported encoding (`Buffer.isEncoding`)?
    pub fn is_encoding(name: &str) -> bool {
        Self::parse(name).is_some()
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf8",
            Encoding::Utf16Le => "utf16le",
            Encoding::Latin1 => "latin1",
            Encoding::Ascii => "ascii",
            Encoding::Base64 => "base64",
            Encoding::Base64Url => "base64url",
            Encoding::Hex => "hex",
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    /// Strict parse; unknown names are an error.
    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s, EncodingPolicy::Strict)
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert `text` to bytes.
pub fn decode(text: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf8 => text.as_bytes().to_vec(),
        Encoding::Utf16Le => text::utf16le_decode(text),
        Encoding::Latin1 | Encoding::Ascii => text::latin1_decode(text),
        Encoding::Base64 | Encoding::Base64Url => base64::decode(text),
        Encoding::Hex => hex::decode(text),
    }
}

/// Convert bytes to text.
pub fn encode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Utf16Le => text::utf16le_encode(bytes),
        Encoding::Latin1 => text::latin1_encode(bytes),
        Encoding::Ascii => text::ascii_encode(bytes),
        Encoding::Base64 => base64::encode(bytes),
        Encoding::Base64Url => base64::encode_url(bytes),
        Encoding::Hex => ::hex::encode(bytes),
    }
}

/// Number of bytes `text` occupies in `encoding` (`Buffer.byteLength`).
///
/// hex and base64 lengths are derived from the character count alone; the
/// text is not decoded, so invalid characters and whitespace are counted
/// as if they were data.
pub fn byte_length(text: &str, encoding: Encoding) -> usize {
    match encoding {
        Encoding::Utf8 => text.len(),
        Encoding::Utf16Le => text::utf16_len(text) * 2,
        Encoding::Latin1 | Encoding::Ascii => text::utf16_len(text),
        Encoding::Base64 | Encoding::Base64Url => base64::byte_length(text),
        Encoding::Hex => text::utf16_len(text) >> 1,
    }
}
