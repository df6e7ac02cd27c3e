//! Loose base64 decoding and length estimation.
//!
//! Decoding accepts the standard and URL-safe alphabets interchangeably,
//! skips characters outside them (whitespace, line breaks), and stops at
//! the first `=`.

use ::base64::Engine;
use ::base64::alphabet;
use ::base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD, URL_SAFE_NO_PAD};
use ::base64::engine::DecodePaddingMode;

/// Standard alphabet, padding optional, non-zero trailing bits tolerated.
const LOOSE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

pub(super) fn decode(text: &str) -> Vec<u8> {
    let mut normalized = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '=' => break,
            'A'..='Z' | 'a'..='z' | '0'..='9' | '+' | '/' => normalized.push(c),
            '-' => normalized.push('+'),
            '_' => normalized.push('/'),
            _ => {}
        }
    }

    // A single sextet cannot form a byte.
    if normalized.len() % 4 == 1 {
        normalized.pop();
    }

    LOOSE.decode(normalized).unwrap_or_default()
}

pub(super) fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(super) fn encode_url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Estimated decoded size from the character count and up to two trailing
/// `=` characters.
pub(super) fn byte_length(text: &str) -> usize {
    let padding = text.bytes().rev().take(2).take_while(|&b| b == b'=').count();
    let units = super::text::utf16_len(text) - padding;
    (units * 3) >> 2
}
