//! Cursor over an encoded byte buffer.
//!
//! [`Reader`] is written once and parameterised by a [`BoundsPolicy`]:
//!
//! - [`Checked`] (the default) verifies every read against the buffer length
//!   and reports [`Error::OutOfBounds`] instead of returning a value. The
//!   cursor does not move when a read fails.
//! - [`Unchecked`] skips the report and returns values directly. Callers are
//!   expected to validate availability up front with
//!   [`remaining`](Reader::remaining); reading past the end anyway panics.
//!
//! Decoding uses the same width and byte order as the matching
//! [`Writer`](crate::Writer) operation, so writes and reads at corresponding
//! offsets always agree.

use core::{fmt, marker::PhantomData};

use crate::{
    error::{Error, Result},
    scalar::Scalar,
};

mod private {
    pub trait Sealed {}
}

/// How a [`Reader`] reacts to a read that runs past the end of its buffer.
///
/// This trait is sealed. [`Checked`] and [`Unchecked`] are the only policies.
pub trait BoundsPolicy: private::Sealed {
    /// What a read operation returns for a value of type `T`.
    type Outcome<T>;

    /// Claims `requested` bytes at `*position`, returning where they start.
    #[doc(hidden)]
    fn claim(position: &mut usize, requested: usize, len: usize) -> Self::Outcome<usize>;

    #[doc(hidden)]
    fn map<T, U>(outcome: Self::Outcome<T>, f: impl FnOnce(T) -> U) -> Self::Outcome<U>;
}

/// Bounds policy that reports out-of-range reads as [`Error::OutOfBounds`].
#[derive(Debug, Clone, Copy)]
pub enum Checked {}

/// Bounds policy for pre-validated input. Reads return plain values and panic
/// if they run past the end of the buffer.
#[derive(Debug, Clone, Copy)]
pub enum Unchecked {}

impl private::Sealed for Checked {}
impl private::Sealed for Unchecked {}

impl BoundsPolicy for Checked {
    type Outcome<T> = Result<T>;

    #[inline]
    fn claim(position: &mut usize, requested: usize, len: usize) -> Result<usize> {
        match position.checked_add(requested) {
            Some(end) if end <= len => {
                let start = *position;
                *position = end;
                Ok(start)
            }
            _ => {
                tracing::debug!(
                    target: "packet::reader",
                    position = *position,
                    requested,
                    len,
                    "read out of bounds"
                );
                Err(Error::OutOfBounds {
                    position: *position,
                    requested,
                    len,
                })
            }
        }
    }

    #[inline]
    fn map<T, U>(outcome: Result<T>, f: impl FnOnce(T) -> U) -> Result<U> {
        outcome.map(f)
    }
}

impl BoundsPolicy for Unchecked {
    type Outcome<T> = T;

    #[inline]
    fn claim(position: &mut usize, requested: usize, _len: usize) -> usize {
        let start = *position;
        *position += requested;
        start
    }

    #[inline]
    fn map<T, U>(outcome: T, f: impl FnOnce(T) -> U) -> U {
        f(outcome)
    }
}

/// Read cursor over a borrowed, fully-formed byte buffer.
///
/// ```rust
/// use packet::{Error, Reader};
///
/// let mut reader = Reader::new(&[5, 0, 0, 0, b'h', b'e', b'l', b'l', b'o']);
/// let len = reader.read_uint32()? as usize;
/// assert_eq!(reader.read_string(len)?, "hello");
/// assert!(matches!(reader.read_uint8(), Err(Error::OutOfBounds { .. })));
/// # Ok::<(), Error>(())
/// ```
pub struct Reader<'a, P: BoundsPolicy = Checked> {
    buf: &'a [u8],
    position: usize,
    _policy: PhantomData<P>,
}

/// A [`Reader`] without reported bounds failures.
pub type UncheckedReader<'a> = Reader<'a, Unchecked>;

macro_rules! read_scalar {
    ($($(#[$doc:meta])* $name:ident => $ty:ty;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name(&mut self) -> P::Outcome<$ty> {
                self.read::<$ty>()
            }
        )*
    };
}

impl<'a> Reader<'a, Checked> {
    /// Creates a bounds-checked reader positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_policy(buf)
    }

    /// Reads `len` bytes and decodes them as UTF-8.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if fewer than `len` bytes remain, and
    /// [`Error::InvalidUtf8`] if the bytes are not UTF-8. The cursor is left
    /// where it was in both cases.
    pub fn read_string(&mut self, len: usize) -> Result<&'a str> {
        let start = self.position;
        let bytes = self.read_slice(len)?;
        core::str::from_utf8(bytes).map_err(|source| {
            self.position = start;
            Error::InvalidUtf8 {
                position: start,
                source,
            }
        })
    }

    /// Reads a `u32` byte length followed by that many UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// As [`read_string`](Self::read_string); the cursor is restored to
    /// before the length prefix on failure.
    pub fn read_prefixed_string(&mut self) -> Result<&'a str> {
        let start = self.position;
        self.read_len()
            .and_then(|len| self.read_string(len))
            .inspect_err(|_| self.position = start)
    }

    /// Reads a `u32` length followed by that many raw bytes.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if the prefix or the bytes run past the end of
    /// the buffer; the cursor is restored to before the prefix.
    pub fn read_prefixed_slice(&mut self) -> Result<&'a [u8]> {
        let start = self.position;
        self.read_len()
            .and_then(|len| self.read_slice(len))
            .inspect_err(|_| self.position = start)
    }
}

impl<'a> Reader<'a, Unchecked> {
    /// Creates a reader that does not report out-of-bounds reads.
    #[must_use]
    pub fn new_unchecked(buf: &'a [u8]) -> Self {
        Self::with_policy(buf)
    }
}

impl<'a, P: BoundsPolicy> Reader<'a, P> {
    /// Creates a reader with an explicitly chosen bounds policy.
    #[must_use]
    pub fn with_policy(buf: &'a [u8]) -> Self {
        Self {
            buf,
            position: 0,
            _policy: PhantomData,
        }
    }

    /// Number of bytes consumed so far.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left between the cursor and the end of the buffer.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.position)
    }

    /// Total length of the underlying buffer.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the underlying buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Reads any [`Scalar`] in its wire byte order.
    #[inline]
    pub fn read<T: Scalar>(&mut self) -> P::Outcome<T> {
        let buf = self.buf;
        P::map(
            P::claim(&mut self.position, T::WIDTH, buf.len()),
            |start| {
                let mut bytes = T::Bytes::default();
                bytes.as_mut().copy_from_slice(&buf[start..start + T::WIDTH]);
                T::from_wire(bytes)
            },
        )
    }

    read_scalar! {
        /// Reads a single `u8`.
        read_uint8 => u8;
        /// Reads a single little-endian `u16`.
        read_uint16 => u16;
        /// Reads a single little-endian `u32`.
        read_uint32 => u32;
        /// Reads a single `i8`.
        read_int8 => i8;
        /// Reads a single little-endian `i16`.
        read_int16 => i16;
        /// Reads a single little-endian `i32`.
        read_int32 => i32;
        /// Reads a single little-endian IEEE-754 `f32`.
        read_float => f32;
    }

    /// Reads `len` raw bytes, borrowed from the underlying buffer.
    #[inline]
    pub fn read_slice(&mut self, len: usize) -> P::Outcome<&'a [u8]> {
        let buf = self.buf;
        P::map(P::claim(&mut self.position, len, buf.len()), move |start| {
            &buf[start..start + len]
        })
    }

    /// Reads a sequence or string length prefix (a `u32`).
    #[inline]
    pub fn read_len(&mut self) -> P::Outcome<usize> {
        P::map(self.read::<u32>(), |len| len as usize)
    }
}

impl<P: BoundsPolicy> Clone for Reader<'_, P> {
    fn clone(&self) -> Self {
        Self {
            buf: self.buf,
            position: self.position,
            _policy: PhantomData,
        }
    }
}

impl<P: BoundsPolicy> fmt::Debug for Reader<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("position", &self.position)
            .field("len", &self.buf.len())
            .finish()
    }
}
