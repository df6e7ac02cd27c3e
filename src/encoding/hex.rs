//! Hexadecimal decoding with Node's early-stop rules.

use ::hex::FromHexError;

/// Decode hex digit pairs, case-insensitively.
///
/// An odd trailing nibble is dropped and decoding stops at the first pair
/// containing a non-hex character; everything before it is kept.
pub(super) fn decode(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let even = bytes.len() & !1;

    match ::hex::decode(&bytes[..even]) {
        Ok(decoded) => decoded,
        Err(FromHexError::InvalidHexCharacter { index, .. }) => {
            ::hex::decode(&bytes[..index & !1]).unwrap_or_default()
        }
        Err(_) => Vec::new(),
    }
}
