//! Reusable encode buffer for string writes.
//!
//! A [`Writer`](crate::Writer) encodes every string into one
//! [`StringScratch`] before copying it into the output, so a long run of
//! string writes touches a single allocation instead of one per string.
//!
//! The buffer is grown *before* encoding to the worst-case size of the input,
//! so an encode can never truncate:
//!
//! - `&str` input is already UTF-8, so the worst case is its byte length.
//! - UTF-16 input needs at most [`MAX_UTF8_PER_UTF16_UNIT`] bytes per code
//!   unit (a surrogate pair is two units for four bytes; a lone unit is at
//!   most three).

use alloc::{vec, vec::Vec};
use core::fmt;

use bstr::BStr;

/// Initial scratch size used by [`StringScratch::new`].
pub const DEFAULT_SCRATCH_CAPACITY: usize = 1024;

/// Upper bound on UTF-8 bytes produced per UTF-16 code unit.
pub const MAX_UTF8_PER_UTF16_UNIT: usize = 3;

/// Grow-on-demand scratch area holding the most recently encoded string.
pub struct StringScratch {
    buf: Vec<u8>,
    len: usize,
}

impl StringScratch {
    /// Creates a scratch buffer of [`DEFAULT_SCRATCH_CAPACITY`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SCRATCH_CAPACITY)
    }

    /// Creates a scratch buffer of `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            len: 0,
        }
    }

    /// Bytes the buffer can hold without growing.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Length of the most recently encoded string.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the most recent encode produced no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bytes of the most recently encoded string.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Encodes `value` at offset 0 and returns the number of bytes written.
    pub fn encode(&mut self, value: &str) -> usize {
        let bytes = value.as_bytes();
        self.reserve(bytes.len());
        self.buf[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len();
        self.len
    }

    /// Encodes UTF-16 code units as UTF-8 at offset 0 and returns the number
    /// of bytes written.
    ///
    /// Unpaired surrogates are encoded as U+FFFD REPLACEMENT CHARACTER.
    pub fn encode_utf16(&mut self, units: &[u16]) -> usize {
        self.reserve(units.len().saturating_mul(MAX_UTF8_PER_UTF16_UNIT));
        let mut written = 0;
        for ch in char::decode_utf16(units.iter().copied()) {
            let ch = ch.unwrap_or(char::REPLACEMENT_CHARACTER);
            written += ch.encode_utf8(&mut self.buf[written..]).len();
        }
        self.len = written;
        written
    }

    /// Copies the most recently encoded bytes into `destination`, starting at
    /// `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `destination` is shorter than `offset + self.len()`.
    #[inline]
    pub fn get_into(&self, destination: &mut [u8], offset: usize) {
        destination[offset..offset + self.len].copy_from_slice(self.as_bytes());
    }

    fn reserve(&mut self, worst_case: usize) {
        if self.buf.len() >= worst_case {
            return;
        }
        let new_capacity = worst_case.max(self.buf.len().saturating_mul(2));
        tracing::trace!(
            target: "packet::scratch",
            old_capacity = self.buf.len(),
            new_capacity,
            "growing string scratch"
        );
        // Previous contents are dead: every encode starts at offset 0.
        self.buf.clear();
        self.buf.resize(new_capacity, 0);
    }
}

impl Default for StringScratch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringScratch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringScratch")
            .field("capacity", &self.capacity())
            .field("encoded", &BStr::new(self.as_bytes()))
            .finish()
    }
}
