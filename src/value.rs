//! Loosely typed host values and the coercions applied to them.
//!
//! Script engines hand the buffer layer dynamically typed values. Only the
//! outer surfaces accept them: index writes ([`Buffer::put`]) coerce almost
//! anything to a byte, allocation sizes are validated with
//! [`size_from_value`], and the `*_value` numeric accessors validate
//! offsets strictly. Everything inside the crate works on typed Rust values.
//!
//! [`Buffer::put`]: crate::buffer::Buffer::put

use crate::buffer::Buffer;
use crate::error::{Error, Result, format_bigint, format_number};
use crate::memory::defaults::MAX_LENGTH;

/// A dynamically typed value coming from the host engine.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A bigint.
    BigInt(i128),
    /// A string.
    String(String),
    /// A plain `Uint8Array` that is not a buffer.
    TypedArray(Vec<u8>),
    /// A buffer.
    Buffer(Buffer),
}

impl Value {
    /// Name of the value's type as reported by `typeof`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::TypedArray(_) | Value::Buffer(_) => "object",
        }
    }

    /// The `Received ...` part of a type error message.
    pub fn describe(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => format!("type boolean ({b})"),
            Value::Number(n) => format!("type number ({})", format_number(*n)),
            Value::BigInt(n) => format!("type bigint ({})", format_bigint(*n)),
            Value::String(s) => {
                let shown: String = s.chars().take(25).collect();
                if shown.len() < s.len() {
                    format!("type string ('{shown}'...)")
                } else {
                    format!("type string ('{shown}')")
                }
            }
            Value::TypedArray(_) => "an instance of Uint8Array".to_string(),
            Value::Buffer(_) => "an instance of Buffer".to_string(),
        }
    }

    /// JavaScript `ToNumber`.
    ///
    /// Bigints cannot be converted implicitly and are a type error. Arrays
    /// convert through their comma-joined string form, so only single
    /// element arrays produce a number.
    pub fn to_number(&self) -> Result<f64> {
        match self {
            Value::Undefined => Ok(f64::NAN),
            Value::Null => Ok(0.0),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Ok(*n),
            Value::BigInt(_) => Err(Error::InvalidType {
                name: "value",
                expected: "number",
                received: self.describe(),
            }),
            Value::String(s) => Ok(string_to_number(s)),
            Value::TypedArray(bytes) => Ok(bytes_to_number(bytes)),
            Value::Buffer(buf) => Ok(bytes_to_number(&buf.to_vec())),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Number(value.into())
    }
}

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Value::BigInt(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::TypedArray(value)
    }
}

impl From<Buffer> for Value {
    fn from(value: Buffer) -> Self {
        Value::Buffer(value)
    }
}

/// `Buffer.isBuffer`: true only for buffers, not for plain typed arrays.
pub fn is_buffer(value: &Value) -> bool {
    matches!(value, Value::Buffer(_))
}

/// Reduce a number to a byte the way a `Uint8Array` store does: truncate,
/// then wrap modulo 256. NaN and infinities become 0.
pub fn uint8_from_number(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(256.0) as u8
}

/// Coerce any host value to a byte. Unconvertible values become 0.
pub fn to_uint8(value: &Value) -> u8 {
    value.to_number().map(uint8_from_number).unwrap_or(0)
}

/// Validate an allocation size given as a host value.
///
/// # Errors
///
/// - [`Error::InvalidType`] if `value` is not a number
/// - [`Error::InvalidSize`] if it is NaN, infinite, negative, fractional or
///   above `MAX_LENGTH`
pub fn size_from_value(value: &Value) -> Result<usize> {
    let Value::Number(size) = *value else {
        return Err(Error::InvalidType {
            name: "size",
            expected: "number",
            received: value.describe(),
        });
    };

    if !size.is_finite() || size < 0.0 || size.fract() != 0.0 || size > MAX_LENGTH as f64 {
        return Err(Error::InvalidSize(format_number(size)));
    }
    Ok(size as usize)
}

fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u128::from_str_radix(&s[2..], radix).map_or(f64::NAN, |n| n as f64);
    }

    match s.strip_prefix(['+', '-']).unwrap_or(s) {
        "Infinity" if s.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        // Rust accepts "inf" and "nan", JavaScript does not.
        rest if rest.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => f64::NAN,
        _ => s.parse().unwrap_or(f64::NAN),
    }
}

fn bytes_to_number(bytes: &[u8]) -> f64 {
    match bytes {
        [] => 0.0,
        [b] => f64::from(*b),
        _ => f64::NAN,
    }
}
