//! Fixed-width numeric codec.
//!
//! A [`NumericField`] describes one binary number layout: width, kind and
//! byte order. Fields are plain `const` data; the standard layouts of the
//! `readUInt16BE`-style accessors are provided as associated constants and
//! the variable width integers of `readIntLE(offset, byteLength)` are built
//! with [`NumericField::uint`] / [`NumericField::int`].
//!
//! ```text
//! write(bytes, value, offset)
//!   │
//!   ├─ value kind matches field?      no → InvalidType
//!   ├─ integer value within range?    no → OutOfRange("value")
//!   ├─ offset + width <= len?         no → OutOfRange("offset") / BufferOutOfBounds
//!   └─ store, return offset + width
//! ```
//!
//! Integer fields up to 6 bytes and floats take [`NumericValue::Number`];
//! 64-bit integer fields take [`NumericValue::BigInt`], held in an `i128`
//! so both the signed and unsigned range fit without loss.
//!
//! Offsets arriving from the host as loose values go through
//! [`NumericField::offset_from_value`], which never coerces.

use crate::error::{Error, Result, format_bigint, format_number};
use crate::value::Value;

/// Byte order of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

/// What a field stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// Unsigned integer, 1 to 6 bytes.
    Unsigned,
    /// Two's complement integer, 1 to 6 bytes.
    Signed,
    /// IEEE 754 float, 4 or 8 bytes.
    Float,
    /// Unsigned 64-bit integer read and written as a bigint.
    BigUnsigned,
    /// Signed 64-bit integer read and written as a bigint.
    BigSigned,
}

/// A number as seen by the host: either a double or a bigint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    /// A double precision number.
    Number(f64),
    /// An arbitrary precision integer, limited to `i128`.
    BigInt(i128),
}

impl NumericValue {
    /// The value as a double, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumericValue::Number(n) => Some(*n),
            NumericValue::BigInt(_) => None,
        }
    }

    /// The value as a bigint, if it is one.
    pub fn as_bigint(&self) -> Option<i128> {
        match self {
            NumericValue::BigInt(n) => Some(*n),
            NumericValue::Number(_) => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            NumericValue::Number(n) => format!("type number ({})", format_number(*n)),
            NumericValue::BigInt(n) => format!("type bigint ({})", format_bigint(*n)),
        }
    }
}

impl std::fmt::Display for NumericValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericValue::Number(n) => f.write_str(&format_number(*n)),
            NumericValue::BigInt(n) => write!(f, "{n}n"),
        }
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for NumericValue {
            fn from(value: $ty) -> Self {
                NumericValue::Number(value.into())
            }
        })*
    };
}

macro_rules! bigint_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for NumericValue {
            fn from(value: $ty) -> Self {
                NumericValue::BigInt(value.into())
            }
        })*
    };
}

number_from!(u8, i8, u16, i16, u32, i32, f32, f64);
bigint_from!(u64, i64, i128);

/// Layout of a binary number inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumericField {
    width: usize,
    kind: NumericKind,
    endian: Endian,
}

impl NumericField {
    /// `readUInt8` / `writeUInt8`
    pub const U8: Self = Self::new(1, NumericKind::Unsigned, Endian::Big);
    /// `readInt8` / `writeInt8`
    pub const I8: Self = Self::new(1, NumericKind::Signed, Endian::Big);
    /// `readUInt16LE`
    pub const U16_LE: Self = Self::new(2, NumericKind::Unsigned, Endian::Little);
    /// `readUInt16BE`
    pub const U16_BE: Self = Self::new(2, NumericKind::Unsigned, Endian::Big);
    /// `readInt16LE`
    pub const I16_LE: Self = Self::new(2, NumericKind::Signed, Endian::Little);
    /// `readInt16BE`
    pub const I16_BE: Self = Self::new(2, NumericKind::Signed, Endian::Big);
    /// `readUInt32LE`
    pub const U32_LE: Self = Self::new(4, NumericKind::Unsigned, Endian::Little);
    /// `readUInt32BE`
    pub const U32_BE: Self = Self::new(4, NumericKind::Unsigned, Endian::Big);
    /// `readInt32LE`
    pub const I32_LE: Self = Self::new(4, NumericKind::Signed, Endian::Little);
    /// `readInt32BE`
    pub const I32_BE: Self = Self::new(4, NumericKind::Signed, Endian::Big);
    /// `readFloatLE`
    pub const F32_LE: Self = Self::new(4, NumericKind::Float, Endian::Little);
    /// `readFloatBE`
    pub const F32_BE: Self = Self::new(4, NumericKind::Float, Endian::Big);
    /// `readDoubleLE`
    pub const F64_LE: Self = Self::new(8, NumericKind::Float, Endian::Little);
    /// `readDoubleBE`
    pub const F64_BE: Self = Self::new(8, NumericKind::Float, Endian::Big);
    /// `readBigUInt64LE`
    pub const BIG_U64_LE: Self = Self::new(8, NumericKind::BigUnsigned, Endian::Little);
    /// `readBigUInt64BE`
    pub const BIG_U64_BE: Self = Self::new(8, NumericKind::BigUnsigned, Endian::Big);
    /// `readBigInt64LE`
    pub const BIG_I64_LE: Self = Self::new(8, NumericKind::BigSigned, Endian::Little);
    /// `readBigInt64BE`
    pub const BIG_I64_BE: Self = Self::new(8, NumericKind::BigSigned, Endian::Big);

    const fn new(width: usize, kind: NumericKind, endian: Endian) -> Self {
        Self { width, kind, endian }
    }

    /// Unsigned integer of `byte_length` bytes (`readUIntLE` and friends).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] unless `1 <= byte_length <= 6`.
    pub fn uint(byte_length: usize, endian: Endian) -> Result<Self> {
        check_byte_length(byte_length)?;
        Ok(Self::new(byte_length, NumericKind::Unsigned, endian))
    }

    /// Signed integer of `byte_length` bytes (`readIntLE` and friends).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] unless `1 <= byte_length <= 6`.
    pub fn int(byte_length: usize, endian: Endian) -> Result<Self> {
        check_byte_length(byte_length)?;
        Ok(Self::new(byte_length, NumericKind::Signed, endian))
    }

    /// Width in bytes.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// What the field stores.
    #[inline]
    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    /// Byte order.
    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Does the field read and write bigints?
    #[inline]
    pub fn is_bigint(&self) -> bool {
        matches!(self.kind, NumericKind::BigUnsigned | NumericKind::BigSigned)
    }

    /// Validate a host-supplied offset for a buffer of `len` bytes.
    ///
    /// `undefined` means 0. Anything that is not a number is rejected, never
    /// coerced.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidType`] for non-number offsets
    /// - [`Error::OutOfRange`] for fractional or out of bounds offsets
    /// - [`Error::BufferOutOfBounds`] when the buffer is shorter than the field
    pub fn offset_from_value(&self, offset: &Value, len: usize) -> Result<usize> {
        let offset = offset_number(offset)?;

        if offset.is_nan() || (offset.is_finite() && offset.fract() != 0.0) {
            return Err(Error::out_of_range("offset", "an integer", format_number(offset)));
        }
        let Some(last) = len.checked_sub(self.width) else {
            return Err(Error::BufferOutOfBounds(None));
        };
        if offset < 0.0 || offset > last as f64 {
            return Err(Error::out_of_range(
                "offset",
                format!(">= 0 and <= {last}"),
                format_number(offset),
            ));
        }
        Ok(offset as usize)
    }

    /// Read the field at `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] / [`Error::BufferOutOfBounds`] if the field does
    /// not fit.
    pub fn read(&self, bytes: &[u8], offset: usize) -> Result<NumericValue> {
        self.check_bounds(bytes.len(), offset)?;
        let raw = self.load(&bytes[offset..offset + self.width]);

        let value = match self.kind {
            NumericKind::Unsigned => NumericValue::Number(raw as f64),
            NumericKind::Signed => NumericValue::Number(self.sign_extend(raw) as f64),
            NumericKind::Float if self.width == 4 => {
                NumericValue::Number(f32::from_bits(raw as u32).into())
            }
            NumericKind::Float => NumericValue::Number(f64::from_bits(raw)),
            NumericKind::BigUnsigned => NumericValue::BigInt(raw.into()),
            NumericKind::BigSigned => NumericValue::BigInt((raw as i64).into()),
        };
        Ok(value)
    }

    /// Write `value` at `offset` and return `offset + width`.
    ///
    /// Integer values are truncated towards zero after the range check; NaN
    /// stores 0.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidType`] if a bigint is given to a number field or the
    ///   other way round
    /// - [`Error::OutOfRange`] naming `value` for integers outside the field
    /// - [`Error::OutOfRange`] / [`Error::BufferOutOfBounds`] if the field
    ///   does not fit
    pub fn write(&self, bytes: &mut [u8], value: impl Into<NumericValue>, offset: usize) -> Result<usize> {
        let raw = self.encode(value.into())?;
        self.check_bounds(bytes.len(), offset)?;
        self.store(&mut bytes[offset..offset + self.width], raw);
        Ok(offset + self.width)
    }

    /// Type and range check `value`, producing the bit pattern to store.
    fn encode(&self, value: NumericValue) -> Result<u64> {
        match (self.kind, value) {
            (NumericKind::Float, NumericValue::Number(n)) if self.width == 4 => {
                Ok((n as f32).to_bits().into())
            }
            (NumericKind::Float, NumericValue::Number(n)) => Ok(n.to_bits()),
            (NumericKind::Unsigned | NumericKind::Signed, NumericValue::Number(n)) => {
                let (min, max) = self.int_range();
                if n < min as f64 || n > max as f64 {
                    return Err(Error::out_of_range("value", self.range_text(min, max), format_number(n)));
                }
                let n = if n.is_nan() { 0 } else { n.trunc() as i64 };
                Ok(n as u64)
            }
            (NumericKind::BigUnsigned | NumericKind::BigSigned, NumericValue::BigInt(n)) => {
                let (min, max) = self.int_range();
                if n < min || n > max {
                    return Err(Error::out_of_range("value", self.range_text(min, max), format_bigint(n)));
                }
                Ok(n as u64)
            }
            (_, value) => Err(Error::InvalidType {
                name: "value",
                expected: if self.is_bigint() { "bigint" } else { "number" },
                received: value.describe(),
            }),
        }
    }

    pub(crate) fn check_bounds(&self, len: usize, offset: usize) -> Result<()> {
        let Some(last) = len.checked_sub(self.width) else {
            return Err(Error::BufferOutOfBounds(None));
        };
        if offset > last {
            return Err(Error::out_of_range("offset", format!(">= 0 and <= {last}"), offset));
        }
        Ok(())
    }

    fn int_range(&self) -> (i128, i128) {
        let bits = self.width as u32 * 8;
        match self.kind {
            NumericKind::Signed | NumericKind::BigSigned => (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1),
            _ => (0, (1i128 << bits) - 1),
        }
    }

    fn range_text(&self, min: i128, max: i128) -> String {
        let n = if self.is_bigint() { "n" } else { "" };
        let bits = self.width * 8;
        if self.width <= 4 {
            format!(">= {min}{n} and <= {max}{n}")
        } else if min == 0 {
            format!(">= 0{n} and < 2{n} ** {bits}{n}")
        } else {
            format!(">= -(2{n} ** {}{n}) and < 2 ** {}{n}", bits - 1, bits - 1)
        }
    }

    fn sign_extend(&self, raw: u64) -> i64 {
        let shift = 64 - self.width as u32 * 8;
        ((raw << shift) as i64) >> shift
    }

    fn load(&self, bytes: &[u8]) -> u64 {
        let fold = |acc: u64, &b: &u8| (acc << 8) | u64::from(b);
        match self.endian {
            Endian::Big => bytes.iter().fold(0, fold),
            Endian::Little => bytes.iter().rev().fold(0, fold),
        }
    }

    fn store(&self, bytes: &mut [u8], raw: u64) {
        let le = raw.to_le_bytes();
        let le = &le[..self.width];
        match self.endian {
            Endian::Little => bytes.copy_from_slice(le),
            Endian::Big => {
                for (dst, src) in bytes.iter_mut().zip(le.iter().rev()) {
                    *dst = *src;
                }
            }
        }
    }
}

fn check_byte_length(byte_length: usize) -> Result<()> {
    if (1..=6).contains(&byte_length) {
        Ok(())
    } else {
        Err(Error::out_of_range("byteLength", ">= 1 and <= 6", byte_length))
    }
}

/// Type check a host offset: `undefined` means 0, anything but a number is
/// rejected.
pub(crate) fn offset_number(offset: &Value) -> Result<f64> {
    match *offset {
        Value::Undefined => Ok(0.0),
        Value::Number(n) => Ok(n),
        _ => Err(Error::InvalidType {
            name: "offset",
            expected: "number",
            received: offset.describe(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(field: NumericField, value: impl Into<NumericValue>) -> NumericValue {
        let mut bytes = [0u8; 8];
        field.write(&mut bytes, value, 0).unwrap();
        field.read(&bytes, 0).unwrap()
    }

    #[test]
    fn test_layouts() {
        let mut bytes = [0u8; 4];
        NumericField::U32_BE.write(&mut bytes, 0x01020304u32, 0).unwrap();
        assert_eq!(bytes, [1, 2, 3, 4]);
        NumericField::U32_LE.write(&mut bytes, 0x01020304u32, 0).unwrap();
        assert_eq!(bytes, [4, 3, 2, 1]);
        NumericField::I16_BE.write(&mut bytes, -2, 0).unwrap();
        assert_eq!(bytes[..2], [0xff, 0xfe]);
    }

    #[test]
    fn test_write_returns_next_offset() {
        let mut bytes = [0u8; 16];
        let next = NumericField::U8.write(&mut bytes, 1, 0).unwrap();
        let next = NumericField::U16_LE.write(&mut bytes, 2, next).unwrap();
        let next = NumericField::F64_BE.write(&mut bytes, 3.5, next).unwrap();
        assert_eq!(next, 11);
    }

    #[test]
    fn test_symmetry() {
        assert_eq!(round_trip(NumericField::I8, -128), NumericValue::Number(-128.0));
        assert_eq!(round_trip(NumericField::U16_BE, 65535), NumericValue::Number(65535.0));
        assert_eq!(round_trip(NumericField::I32_LE, i32::MIN), NumericValue::Number(i32::MIN.into()));
        assert_eq!(round_trip(NumericField::U32_BE, u32::MAX), NumericValue::Number(u32::MAX.into()));
        assert_eq!(round_trip(NumericField::BIG_I64_BE, i64::MAX), NumericValue::BigInt(i64::MAX.into()));
        assert_eq!(round_trip(NumericField::BIG_I64_LE, i64::MIN), NumericValue::BigInt(i64::MIN.into()));
        assert_eq!(round_trip(NumericField::BIG_U64_LE, u64::MAX), NumericValue::BigInt(u64::MAX.into()));
    }

    #[test]
    fn test_float_bits_exact() {
        for value in [0.0, -0.0, f64::MIN_POSITIVE / 2.0, f64::INFINITY, f64::NEG_INFINITY] {
            let back = round_trip(NumericField::F64_LE, value).as_f64().unwrap();
            assert_eq!(back.to_bits(), value.to_bits());
        }

        let payload = f64::from_bits(0x7ff8_0000_dead_beef);
        let back = round_trip(NumericField::F64_BE, payload).as_f64().unwrap();
        assert_eq!(back.to_bits(), payload.to_bits());

        let neg_zero = round_trip(NumericField::F32_BE, -0.0).as_f64().unwrap();
        assert!(neg_zero == 0.0 && neg_zero.is_sign_negative());
        assert!(round_trip(NumericField::F32_LE, f64::NAN).as_f64().unwrap().is_nan());
        assert_eq!(round_trip(NumericField::F32_LE, 1.1f32).as_f64().unwrap(), f64::from(1.1f32));
    }

    #[test]
    fn test_variable_width() {
        let field = NumericField::int(6, Endian::Little).unwrap();
        assert_eq!(round_trip(field, -(2f64.powi(47))), NumericValue::Number(-(2f64.powi(47))));

        let field = NumericField::uint(3, Endian::Big).unwrap();
        let mut bytes = [0u8; 3];
        field.write(&mut bytes, 0x123456, 0).unwrap();
        assert_eq!(bytes, [0x12, 0x34, 0x56]);

        let err = NumericField::uint(7, Endian::Big).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the value of \"byteLength\" is out of range. It must be >= 1 and <= 6. Received 7"
        );
        assert!(NumericField::int(0, Endian::Big).is_err());
    }

    #[test]
    fn test_value_range() {
        let mut bytes = [0u8; 8];
        let err = NumericField::U8.write(&mut bytes, 256, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the value of \"value\" is out of range. It must be >= 0 and <= 255. Received 256"
        );

        let err = NumericField::I16_LE.write(&mut bytes, -32769, 0).unwrap_err();
        assert!(err.to_string().contains(">= -32768 and <= 32767"));

        let field = NumericField::uint(6, Endian::Little).unwrap();
        let err = field.write(&mut bytes, -1, 0).unwrap_err();
        assert!(err.to_string().contains(">= 0 and < 2 ** 48"));

        let err = NumericField::BIG_I64_BE.write(&mut bytes, 1i128 << 63, 0).unwrap_err();
        assert!(err.to_string().contains(">= -(2n ** 63n) and < 2 ** 63n"));
        assert!(err.to_string().ends_with("Received 9_223_372_036_854_775_808n"));

        let err = NumericField::BIG_U64_BE.write(&mut bytes, -1i64, 0).unwrap_err();
        assert!(err.to_string().contains(">= 0n and < 2n ** 64n"));
    }

    #[test]
    fn test_truncation_and_nan() {
        let mut bytes = [0xffu8; 2];
        NumericField::U8.write(&mut bytes, 7.9, 0).unwrap();
        assert_eq!(bytes[0], 7);
        NumericField::I8.write(&mut bytes, f64::NAN, 1).unwrap();
        assert_eq!(bytes[1], 0);
    }

    #[test]
    fn test_type_mismatch() {
        let mut bytes = [0u8; 8];
        let err = NumericField::BIG_I64_LE.write(&mut bytes, 5, 0).unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_ARG_TYPE");
        let err = NumericField::U32_LE.write(&mut bytes, 5i64, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidType { expected: "number", .. }));
    }

    #[test]
    fn test_bounds() {
        let mut bytes = [0u8; 8];
        assert!(NumericField::U32_LE.write(&mut bytes, 1, 4).is_ok());
        let err = NumericField::U32_LE.write(&mut bytes, 1, 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the value of \"offset\" is out of range. It must be >= 0 and <= 4. Received 5"
        );

        let err = NumericField::F64_LE.read(&bytes[..4], 0).unwrap_err();
        assert!(matches!(err, Error::BufferOutOfBounds(None)));
    }

    #[test]
    fn test_offset_from_value() {
        let field = NumericField::U16_LE;
        assert_eq!(field.offset_from_value(&Value::Undefined, 4).unwrap(), 0);
        assert_eq!(field.offset_from_value(&Value::Number(2.0), 4).unwrap(), 2);

        for bad in [Value::from("1"), Value::Bool(true), Value::BigInt(1), Value::Null] {
            let err = field.offset_from_value(&bad, 4).unwrap_err();
            assert_eq!(err.code(), "ERR_INVALID_ARG_TYPE", "{bad:?}");
        }

        let err = field.offset_from_value(&Value::Number(1.5), 4).unwrap_err();
        assert!(err.to_string().contains("It must be an integer. Received 1.5"));
        let err = field.offset_from_value(&Value::Number(f64::NAN), 4).unwrap_err();
        assert!(err.to_string().contains("an integer"));
        let err = field.offset_from_value(&Value::Number(-1.0), 4).unwrap_err();
        assert!(err.to_string().contains(">= 0 and <= 2. Received -1"));
        let err = field.offset_from_value(&Value::Number(f64::INFINITY), 4).unwrap_err();
        assert!(err.to_string().contains("Received Infinity"));
        let err = field.offset_from_value(&Value::Number(0.0), 1).unwrap_err();
        assert_eq!(err.code(), "ERR_BUFFER_OUT_OF_BOUNDS");
    }
}
