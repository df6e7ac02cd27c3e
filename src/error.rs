//! Error types for node-buffer.
//!
//! Every variant maps onto the Node.js error code that the equivalent
//! `Buffer` operation throws, available through [`Error::code`].

use thiserror::Error;

/// Result type alias using node-buffer's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for buffer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Allocation size is not a non-negative safe integer within `MAX_LENGTH`.
    #[error("the value of \"size\" is out of range. It must be >= 0 && <= 9007199254740991. Received {0}")]
    InvalidSize(String),

    /// An index, offset, length or value lies outside its valid range.
    #[error("the value of \"{name}\" is out of range. It must be {range}. Received {received}")]
    OutOfRange {
        /// Name of the offending argument.
        name: &'static str,
        /// Human readable description of the accepted range.
        range: String,
        /// The rejected value, formatted the way Node.js prints it.
        received: String,
    },

    /// The buffer is too short for the requested access.
    #[error("{}", bounds_message(.0))]
    BufferOutOfBounds(Option<&'static str>),

    /// An argument has the wrong type where strict typing is required.
    #[error("the \"{name}\" argument must be of type {expected}. Received {received}")]
    InvalidType {
        /// Name of the offending argument.
        name: &'static str,
        /// Expected type name.
        expected: &'static str,
        /// Description of what was received.
        received: String,
    },

    /// An argument has an acceptable type but an unusable value.
    #[error("the argument '{name}' is invalid. Received {received}")]
    InvalidArgValue {
        /// Name of the offending argument.
        name: &'static str,
        /// Description of what was received.
        received: String,
    },

    /// Buffer length is not a multiple of the swap width.
    #[error("buffer size must be a multiple of {0}-bits")]
    InvalidBufferSize(usize),

    /// Encoding name not recognised (strict encoding policy only).
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Memory allocation failed.
    #[error("memory allocation failed: {0}")]
    AllocationFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// System call error (via rustix).
    #[error("system error: {0}")]
    System(#[from] rustix::io::Errno),
}

fn bounds_message(name: &Option<&'static str>) -> String {
    match name {
        Some(name) => format!("\"{name}\" is outside of buffer bounds"),
        None => "attempt to access memory outside buffer bounds".to_string(),
    }
}

impl Error {
    /// The Node.js error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidSize(_) => "ERR_OUT_OF_RANGE",
            Error::OutOfRange { .. } => "ERR_OUT_OF_RANGE",
            Error::BufferOutOfBounds(_) => "ERR_BUFFER_OUT_OF_BOUNDS",
            Error::InvalidType { .. } => "ERR_INVALID_ARG_TYPE",
            Error::InvalidArgValue { .. } => "ERR_INVALID_ARG_VALUE",
            Error::InvalidBufferSize(_) => "ERR_INVALID_BUFFER_SIZE",
            Error::UnknownEncoding(_) => "ERR_UNKNOWN_ENCODING",
            Error::AllocationFailed(_) | Error::Io(_) | Error::System(_) => "ERR_MEMORY_ALLOCATION_FAILED",
        }
    }

    /// Returns true for the range/bounds family of errors.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidSize(_)
                | Error::OutOfRange { .. }
                | Error::BufferOutOfBounds(_)
                | Error::InvalidBufferSize(_)
        )
    }

    pub(crate) fn out_of_range(name: &'static str, range: impl Into<String>, received: impl ToString) -> Self {
        Error::OutOfRange {
            name,
            range: range.into(),
            received: received.to_string(),
        }
    }
}

/// Format a number the way JavaScript prints it in error messages.
///
/// Integers beyond 2^32 get `_` digit separators.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() > 4_294_967_296.0 {
        add_separators(&format!("{value}"))
    } else {
        format!("{value}")
    }
}

/// Format a bigint the way JavaScript prints it in error messages.
pub(crate) fn format_bigint(value: i128) -> String {
    let digits = value.to_string();
    if value.unsigned_abs() > 1 << 32 {
        format!("{}n", add_separators(&digits))
    } else {
        format!("{digits}n")
    }
}

fn add_separators(digits: &str) -> String {
    let start = usize::from(digits.starts_with('-'));
    let mut end = digits.len();
    let mut groups = Vec::new();
    while end >= start + 4 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    let mut out = digits[..end].to_string();
    for group in groups.iter().rev() {
        out.push('_');
        out.push_str(group);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(Error::InvalidSize("-1".into()).code(), "ERR_OUT_OF_RANGE");
        assert_eq!(Error::out_of_range("offset", ">= 0", 3).code(), "ERR_OUT_OF_RANGE");
        assert_eq!(Error::BufferOutOfBounds(None).code(), "ERR_BUFFER_OUT_OF_BOUNDS");
        assert_eq!(Error::AllocationFailed("oom".into()).code(), "ERR_MEMORY_ALLOCATION_FAILED");
    }

    #[test]
    fn test_messages() {
        let err = Error::out_of_range("offset", ">= 0 and <= 3", 4);
        assert_eq!(
            err.to_string(),
            "the value of \"offset\" is out of range. It must be >= 0 and <= 3. Received 4"
        );
        assert_eq!(
            Error::BufferOutOfBounds(Some("length")).to_string(),
            "\"length\" is outside of buffer bounds"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(4294967296.0), "4294967296");
        assert_eq!(format_number(4294967297.0), "4_294_967_297");
        assert_eq!(format_number(-1099511627776.0), "-1_099_511_627_776");
    }

    #[test]
    fn test_format_bigint() {
        assert_eq!(format_bigint(5), "5n");
        assert_eq!(format_bigint(-1), "-1n");
        assert_eq!(format_bigint(1 << 64), "18_446_744_073_709_551_616n");
        assert_eq!(format_bigint(-(1 << 63) - 1), "-9_223_372_036_854_775_809n");
    }
}
