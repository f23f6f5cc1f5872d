use core::str::Utf8Error;

use thiserror::Error;

/// Errors surfaced by the checked [`Reader`](crate::Reader) and by generated
/// decoding code built on top of it.
///
/// A [`Reader`](crate::Reader) that has returned an error should be discarded:
/// decoding a value graph is not resumable mid-stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A read needed more bytes than the buffer holds past the cursor.
    #[error("out of bounds: {requested} byte read at offset {position} exceeds buffer of {len} bytes")]
    OutOfBounds {
        /// Cursor position when the read was attempted.
        position: usize,
        /// Number of bytes the read needed.
        requested: usize,
        /// Total length of the buffer.
        len: usize,
    },
    /// A string read covered bytes that are not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {position}: {source}")]
    InvalidUtf8 {
        /// Cursor position where the string starts.
        position: usize,
        /// Underlying validation failure.
        source: Utf8Error,
    },
    /// An enum ordinal did not name any variant of `type_name`.
    #[error("value {value} is not a valid {type_name} variant")]
    InvalidEnumValue {
        /// Ordinal read from the wire.
        value: u32,
        /// Name of the enum the ordinal was decoded for.
        type_name: &'static str,
    },
}

impl Error {
    /// Builds an [`Error::InvalidEnumValue`]. Generated `TryFrom` impls for
    /// schema enums call this for unknown ordinals.
    #[must_use]
    pub fn invalid_enum_value(value: impl Into<u32>, type_name: &'static str) -> Self {
        Self::InvalidEnumValue {
            value: value.into(),
            type_name,
        }
    }
}

/// Shorthand for results carrying a [`packet::Error`](Error).
pub type Result<T, E = Error> = core::result::Result<T, E>;
