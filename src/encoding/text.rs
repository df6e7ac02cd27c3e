//! Character-level codecs: utf16le, latin1 and ascii.

/// Length of `text` in UTF-16 code units.
#[inline]
pub(super) fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

pub(super) fn utf16le_decode(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Low byte of every UTF-16 code unit (used for ascii as well).
pub(super) fn latin1_decode(text: &str) -> Vec<u8> {
    text.encode_utf16().map(|unit| unit as u8).collect()
}

pub(super) fn utf16le_encode(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

pub(super) fn latin1_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

pub(super) fn ascii_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b & 0x7f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16le() {
        assert_eq!(utf16le_decode("hi"), vec![b'h', 0, b'i', 0]);
        assert_eq!(utf16le_decode("😀"), vec![0x3d, 0xd8, 0x00, 0xde]);
        assert_eq!(utf16le_encode(&[b'h', 0, b'i', 0]), "hi");
        // odd trailing byte
        assert_eq!(utf16le_encode(&[b'h', 0, b'i']), "h");
        // lone surrogate
        assert_eq!(utf16le_encode(&[0x3d, 0xd8]), "\u{fffd}");
    }

    #[test]
    fn test_latin1() {
        assert_eq!(latin1_decode("héllo"), vec![b'h', 0xe9, b'l', b'l', b'o']);
        assert_eq!(latin1_decode("€"), vec![0xac]);
        assert_eq!(latin1_encode(&[b'h', 0xe9]), "hé");
    }

    #[test]
    fn test_ascii_masks_high_bit() {
        assert_eq!(ascii_encode(&[0x48, 0xc8, 0xff]), "HH\u{7f}");
    }

    #[test]
    fn test_utf16_len() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("é"), 1);
        assert_eq!(utf16_len("😀"), 2);
    }
}
