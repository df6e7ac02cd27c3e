//! Numeric accessors (`readUInt16BE`, `writeDoubleLE`, `readBigInt64LE`, ...).
//!
//! The generic entry points take a [`NumericField`]; the typed accessors
//! below are thin wrappers generated for every standard layout.

use super::Buffer;
use crate::error::{Error, Result};
use crate::numeric::{Endian, NumericField, NumericValue, offset_number};
use crate::value::Value;

impl Buffer {
    /// Read `field` at `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] / [`Error::BufferOutOfBounds`] if the field does
    /// not fit.
    pub fn read_number(&self, field: NumericField, offset: usize) -> Result<NumericValue> {
        field.check_bounds(self.len, offset)?;
        let mut scratch = [0u8; 8];
        let raw = &mut scratch[..field.width()];
        self.load(offset, raw);
        field.read(raw, 0)
    }

    /// Write `value` as `field` at `offset` and return `offset + width`.
    ///
    /// # Errors
    ///
    /// See [`NumericField::write`].
    pub fn write_number(&self, field: NumericField, value: impl Into<NumericValue>, offset: usize) -> Result<usize> {
        let raw = encode_field(field, value.into())?;
        field.check_bounds(self.len, offset)?;
        self.store(offset, &raw[..field.width()]);
        Ok(offset + field.width())
    }

    /// Read `field` at a host-supplied offset, validated strictly.
    ///
    /// # Errors
    ///
    /// See [`NumericField::offset_from_value`].
    pub fn read_value(&self, field: NumericField, offset: &Value) -> Result<NumericValue> {
        let offset = field.offset_from_value(offset, self.len)?;
        self.read_number(field, offset)
    }

    /// Write a host value as `field` at a host-supplied offset.
    ///
    /// Number fields convert `value` with `ToNumber`; bigint fields require a
    /// bigint. The offset is validated strictly. The value is range checked
    /// before the offset, except that single byte fields reject a non-number
    /// offset first.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidType`] for a bigint given to a number field, or
    ///   anything but a bigint given to a bigint field
    /// - the errors of [`write_number`](Self::write_number) and
    ///   [`NumericField::offset_from_value`]
    pub fn write_value(&self, field: NumericField, value: &Value, offset: &Value) -> Result<usize> {
        let value = if field.is_bigint() {
            match value {
                Value::BigInt(n) => NumericValue::BigInt(*n),
                other => {
                    return Err(Error::InvalidType {
                        name: "value",
                        expected: "bigint",
                        received: other.describe(),
                    });
                }
            }
        } else {
            NumericValue::Number(value.to_number()?)
        };

        // Single byte writes type check the offset before the value range.
        if field.width() == 1 {
            offset_number(offset)?;
        }
        let raw = encode_field(field, value)?;
        let offset = field.offset_from_value(offset, self.len)?;
        self.store(offset, &raw[..field.width()]);
        Ok(offset + field.width())
    }

    /// Unsigned little-endian integer of `byte_length` (1 to 6) bytes.
    pub fn read_uint_le(&self, offset: usize, byte_length: usize) -> Result<u64> {
        self.read_var(NumericField::uint(byte_length, Endian::Little)?, offset).map(|n| n as u64)
    }

    /// Unsigned big-endian integer of `byte_length` (1 to 6) bytes.
    pub fn read_uint_be(&self, offset: usize, byte_length: usize) -> Result<u64> {
        self.read_var(NumericField::uint(byte_length, Endian::Big)?, offset).map(|n| n as u64)
    }

    /// Signed little-endian integer of `byte_length` (1 to 6) bytes.
    pub fn read_int_le(&self, offset: usize, byte_length: usize) -> Result<i64> {
        self.read_var(NumericField::int(byte_length, Endian::Little)?, offset).map(|n| n as i64)
    }

    /// Signed big-endian integer of `byte_length` (1 to 6) bytes.
    pub fn read_int_be(&self, offset: usize, byte_length: usize) -> Result<i64> {
        self.read_var(NumericField::int(byte_length, Endian::Big)?, offset).map(|n| n as i64)
    }

    /// Write an unsigned little-endian integer of `byte_length` bytes.
    pub fn write_uint_le(&self, value: impl Into<NumericValue>, offset: usize, byte_length: usize) -> Result<usize> {
        self.write_number(NumericField::uint(byte_length, Endian::Little)?, value, offset)
    }

    /// Write an unsigned big-endian integer of `byte_length` bytes.
    pub fn write_uint_be(&self, value: impl Into<NumericValue>, offset: usize, byte_length: usize) -> Result<usize> {
        self.write_number(NumericField::uint(byte_length, Endian::Big)?, value, offset)
    }

    /// Write a signed little-endian integer of `byte_length` bytes.
    pub fn write_int_le(&self, value: impl Into<NumericValue>, offset: usize, byte_length: usize) -> Result<usize> {
        self.write_number(NumericField::int(byte_length, Endian::Little)?, value, offset)
    }

    /// Write a signed big-endian integer of `byte_length` bytes.
    pub fn write_int_be(&self, value: impl Into<NumericValue>, offset: usize, byte_length: usize) -> Result<usize> {
        self.write_number(NumericField::int(byte_length, Endian::Big)?, value, offset)
    }

    fn read_var(&self, field: NumericField, offset: usize) -> Result<f64> {
        // integer fields up to 6 bytes always read as numbers
        Ok(self.read_number(field, offset)?.as_f64().unwrap_or_default())
    }
}

/// Type and range check `value`, returning its bytes in field order.
fn encode_field(field: NumericField, value: NumericValue) -> Result<[u8; 8]> {
    let mut scratch = [0u8; 8];
    field.write(&mut scratch[..field.width()], value, 0)?;
    Ok(scratch)
}

/// Conversion from a decoded value to a typed accessor's return type. The
/// field layout guarantees the value fits.
trait FromNumeric {
    fn from_numeric(value: NumericValue) -> Self;
}

macro_rules! from_numeric {
    ($($ty:ty),*) => {
        $(impl FromNumeric for $ty {
            fn from_numeric(value: NumericValue) -> Self {
                match value {
                    NumericValue::Number(n) => n as $ty,
                    NumericValue::BigInt(n) => n as $ty,
                }
            }
        })*
    };
}

from_numeric!(u8, i8, u16, i16, u32, i32, f32, f64, u64, i64);

macro_rules! typed_accessors {
    ($($read:ident, $write:ident, $field:ident, $ty:ty, $node:literal;)*) => {
        impl Buffer {
            $(
                #[doc = concat!("`buf.read", $node, "(offset)`")]
                pub fn $read(&self, offset: usize) -> Result<$ty> {
                    self.read_number(NumericField::$field, offset).map(<$ty>::from_numeric)
                }

                #[doc = concat!("`buf.write", $node, "(value, offset)`, returns the next offset.")]
                pub fn $write(&self, value: $ty, offset: usize) -> Result<usize> {
                    self.write_number(NumericField::$field, value, offset)
                }
            )*
        }
    };
}

typed_accessors! {
    read_u8, write_u8, U8, u8, "UInt8";
    read_i8, write_i8, I8, i8, "Int8";
    read_u16_le, write_u16_le, U16_LE, u16, "UInt16LE";
    read_u16_be, write_u16_be, U16_BE, u16, "UInt16BE";
    read_i16_le, write_i16_le, I16_LE, i16, "Int16LE";
    read_i16_be, write_i16_be, I16_BE, i16, "Int16BE";
    read_u32_le, write_u32_le, U32_LE, u32, "UInt32LE";
    read_u32_be, write_u32_be, U32_BE, u32, "UInt32BE";
    read_i32_le, write_i32_le, I32_LE, i32, "Int32LE";
    read_i32_be, write_i32_be, I32_BE, i32, "Int32BE";
    read_f32_le, write_f32_le, F32_LE, f32, "FloatLE";
    read_f32_be, write_f32_be, F32_BE, f32, "FloatBE";
    read_f64_le, write_f64_le, F64_LE, f64, "DoubleLE";
    read_f64_be, write_f64_be, F64_BE, f64, "DoubleBE";
    read_big_u64_le, write_big_u64_le, BIG_U64_LE, u64, "BigUInt64LE";
    read_big_u64_be, write_big_u64_be, BIG_U64_BE, u64, "BigUInt64BE";
    read_big_i64_le, write_big_i64_le, BIG_I64_LE, i64, "BigInt64LE";
    read_big_i64_be, write_big_i64_be, BIG_I64_BE, i64, "BigInt64BE";
}
