//! Growable output buffer with a write cursor.
//!
//! The backing storage is an explicitly sized arena: every byte up to
//! [`Writer::capacity`] is addressable, and only `[0, position)` holds output.
//! When a write does not fit, [`Writer::ensure`] allocates a new arena of
//! `capacity + 2 * additional` bytes, copies the written prefix and drops the
//! old arena.

use alloc::{vec, vec::Vec};
use core::fmt;

use bstr::BStr;

use crate::{options::WriterOptions, scalar::Scalar, scratch::StringScratch};

/// Byte sink for the wire format.
///
/// None of the write operations can fail. Allocation failure during growth
/// aborts through the global allocator's out-of-memory handler.
///
/// ```rust
/// use packet::Writer;
///
/// let mut writer = Writer::new();
/// writer.write_uint32(1);
/// writer.write_string("hi");
/// assert_eq!(writer.finish(), [1, 0, 0, 0, b'h', b'i']);
/// ```
pub struct Writer {
    buf: Vec<u8>,
    position: usize,
    scratch: StringScratch,
}

macro_rules! write_scalar {
    ($($(#[$doc:meta])* $name:ident => $ty:ty;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name(&mut self, value: $ty) {
                self.write(value);
            }
        )*
    };
}

impl Writer {
    /// Creates a writer with no backing capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default())
    }

    /// Creates a writer whose buffer holds `capacity` bytes before growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(WriterOptions {
            initial_capacity: capacity,
            ..WriterOptions::default()
        })
    }

    /// Creates a writer from explicit [`WriterOptions`].
    #[must_use]
    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            buf: vec![0; options.initial_capacity],
            position: 0,
            scratch: StringScratch::with_capacity(options.scratch_capacity),
        }
    }

    /// Creates a writer that uses `buffer`'s allocation as its initial
    /// storage.
    ///
    /// Writing starts at offset 0, and the whole allocated capacity of
    /// `buffer` is usable before the first growth. Previous contents are
    /// overwritten as the cursor passes over them and never appear in
    /// [`finish`](Self::finish).
    #[must_use]
    pub fn with_buffer(mut buffer: Vec<u8>) -> Self {
        buffer.resize(buffer.capacity(), 0);
        Self {
            buf: buffer,
            position: 0,
            scratch: StringScratch::new(),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes the buffer can hold before the next growth.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// The bytes written so far.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.position]
    }

    /// Makes room for `additional` more bytes past the cursor.
    ///
    /// A no-op when the buffer already has room. Otherwise the buffer is
    /// replaced by one of exactly `capacity + additional * 2` bytes holding a
    /// copy of everything written so far.
    pub fn ensure(&mut self, additional: usize) {
        let old_capacity = self.buf.len();
        if old_capacity >= self.position.saturating_add(additional) {
            return;
        }
        let new_capacity = old_capacity.saturating_add(additional.saturating_mul(2));
        tracing::trace!(
            target: "packet::writer",
            old_capacity,
            new_capacity,
            position = self.position,
            additional,
            "growing writer buffer"
        );
        let mut grown = vec![0; new_capacity];
        grown[..self.position].copy_from_slice(&self.buf[..self.position]);
        self.buf = grown;
    }

    /// Returns the cursor position before advancing it by `by` bytes.
    #[inline]
    fn advance(&mut self, by: usize) -> usize {
        let start = self.position;
        self.position += by;
        start
    }

    /// Writes any [`Scalar`] in its wire byte order.
    #[inline]
    pub fn write<T: Scalar>(&mut self, value: T) {
        self.ensure(T::WIDTH);
        let start = self.advance(T::WIDTH);
        self.buf[start..start + T::WIDTH].copy_from_slice(value.to_wire().as_ref());
    }

    write_scalar! {
        /// Writes a single `u8`.
        write_uint8 => u8;
        /// Writes a single `u16`, little-endian.
        write_uint16 => u16;
        /// Writes a single `u32`, little-endian.
        write_uint32 => u32;
        /// Writes a single `i8`.
        write_int8 => i8;
        /// Writes a single `i16`, little-endian.
        write_int16 => i16;
        /// Writes a single `i32`, little-endian.
        write_int32 => i32;
        /// Writes a single `f32`, little-endian IEEE-754.
        write_float => f32;
    }

    /// Copies `value` verbatim.
    #[inline]
    pub fn write_slice(&mut self, value: &[u8]) {
        self.ensure(value.len());
        let start = self.advance(value.len());
        self.buf[start..start + value.len()].copy_from_slice(value);
    }

    /// Writes the UTF-8 bytes of `value` with no length prefix.
    pub fn write_string(&mut self, value: &str) {
        let len = self.scratch.encode(value);
        self.copy_scratch(len);
    }

    /// Writes UTF-16 text as UTF-8 with no length prefix.
    ///
    /// Unpaired surrogates are written as U+FFFD.
    pub fn write_string_utf16(&mut self, units: &[u16]) {
        let len = self.scratch.encode_utf16(units);
        self.copy_scratch(len);
    }

    fn copy_scratch(&mut self, len: usize) {
        self.ensure(len);
        let start = self.advance(len);
        self.scratch.get_into(&mut self.buf, start);
    }

    /// Writes a sequence or string length prefix: a little-endian `u32`.
    ///
    /// # Panics
    ///
    /// Panics if `len` does not fit in a `u32`; such a value has no wire
    /// representation.
    #[inline]
    pub fn write_len(&mut self, len: usize) {
        let Ok(len) = u32::try_from(len) else {
            panic!("length {len} exceeds the u32 length prefix");
        };
        self.write_uint32(len);
    }

    /// Writes a length-prefixed string: its UTF-8 byte length as a `u32`,
    /// then the bytes.
    ///
    /// # Panics
    ///
    /// Panics if `value` is longer than `u32::MAX` bytes.
    pub fn write_prefixed_string(&mut self, value: &str) {
        self.write_len(value.len());
        self.write_string(value);
    }

    /// Writes a length-prefixed byte run: its length as a `u32`, then the
    /// bytes.
    ///
    /// # Panics
    ///
    /// Panics if `value` is longer than `u32::MAX` bytes.
    pub fn write_prefixed_slice(&mut self, value: &[u8]) {
        self.write_len(value.len());
        self.write_slice(value);
    }

    /// Returns a copy of the bytes written so far.
    ///
    /// Unused trailing capacity is never included. The writer itself is left
    /// untouched.
    #[must_use]
    pub fn finish(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Consumes the writer and returns its buffer truncated to the bytes
    /// written, without copying.
    #[must_use]
    pub fn into_inner(mut self) -> Vec<u8> {
        self.buf.truncate(self.position);
        self.buf
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("position", &self.position)
            .field("capacity", &self.capacity())
            .field("written", &BStr::new(self.as_bytes()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{
        format,
        string::{String, ToString},
        vec::Vec,
    };

    use rstest::rstest;
    use tracing_test::traced_test;

    use super::*;

    const _: fn() = || {
        fn sendable<T: Send>() {}
        sendable::<Writer>();
    };

    #[test]
    fn write_u8() {
        let mut writer = Writer::with_capacity(1);
        writer.write_uint8(100u8);
        assert_eq!(writer.finish(), 100u8.to_le_bytes());
    }

    #[test]
    fn write_u16() {
        let mut writer = Writer::with_capacity(2);
        writer.write_uint16(10_000u16);
        assert_eq!(writer.finish(), 10_000u16.to_le_bytes());
    }

    #[test]
    fn write_u32_one_is_little_endian() {
        let mut writer = Writer::new();
        writer.write_uint32(1);
        assert_eq!(writer.finish(), [1, 0, 0, 0]);
    }

    #[test]
    fn write_i8() {
        let mut writer = Writer::with_capacity(1);
        writer.write_int8(-100i8);
        assert_eq!(writer.finish(), (-100i8).to_le_bytes());
    }

    #[test]
    fn write_i16() {
        let mut writer = Writer::with_capacity(2);
        writer.write_int16(-10_000i16);
        assert_eq!(writer.finish(), (-10_000i16).to_le_bytes());
    }

    #[test]
    fn write_i32() {
        let mut writer = Writer::with_capacity(4);
        writer.write_int32(1_000_000_000i32);
        assert_eq!(writer.finish(), 1_000_000_000i32.to_le_bytes());
    }

    #[test]
    fn write_f32() {
        let mut writer = Writer::with_capacity(4);
        writer.write_float(10.5f32);
        assert_eq!(writer.finish(), 10.5f32.to_le_bytes());
    }

    #[test]
    fn write_string_has_no_prefix() {
        let mut writer = Writer::with_capacity(4);
        writer.write_string("testing");
        assert_eq!(writer.finish(), b"testing");
    }

    #[test]
    fn write_prefixed_string() {
        let mut writer = Writer::new();
        writer.write_prefixed_string("first");
        assert_eq!(writer.finish(), [5, 0, 0, 0, b'f', b'i', b'r', b's', b't']);
    }

    #[test]
    fn write_prefixed_slice() {
        let mut writer = Writer::new();
        writer.write_prefixed_slice(&[9, 8]);
        assert_eq!(writer.finish(), [2, 0, 0, 0, 9, 8]);
    }

    #[rstest]
    #[case::fits(8, 4, 8)]
    #[case::exact_fit(4, 4, 4)]
    #[case::from_empty(0, 4, 8)]
    #[case::additive(3, 4, 11)]
    fn ensure_on_fresh_writer(
        #[case] initial: usize,
        #[case] additional: usize,
        #[case] expected: usize,
    ) {
        let mut writer = Writer::with_capacity(initial);
        writer.ensure(additional);
        assert_eq!(writer.capacity(), expected);
    }

    #[test]
    fn ensure_adds_twice_the_request_to_current_capacity() {
        let mut writer = Writer::with_capacity(10);
        writer.write_slice(&[7; 9]);
        writer.ensure(3);
        assert_eq!(writer.capacity(), 10 + 3 * 2);
        assert_eq!(writer.as_bytes(), [7; 9]);
    }

    #[test]
    fn growth_sequence_from_zero() {
        let mut writer = Writer::new();
        let mut capacities = Vec::new();
        for byte in 0..8u8 {
            writer.write_uint8(byte);
            capacities.push(writer.capacity());
        }
        // 0 -> 2 -> 2 -> 4 -> 4 -> 6 -> 6 -> 8 -> 8
        assert_eq!(capacities, [2, 2, 4, 4, 6, 6, 8, 8]);
        assert_eq!(writer.finish(), [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn finish_excludes_unused_capacity() {
        let mut writer = Writer::with_capacity(64);
        writer.write_uint16(0xbeef);
        let out = writer.finish();
        assert_eq!(out.len(), 2);
        assert_eq!(writer.capacity(), 64);
    }

    #[test]
    fn finish_leaves_writer_usable() {
        let mut writer = Writer::new();
        writer.write_uint8(1);
        assert_eq!(writer.finish(), [1]);
        writer.write_uint8(2);
        assert_eq!(writer.finish(), [1, 2]);
        assert_eq!(writer.into_inner(), [1, 2]);
    }

    #[test]
    fn with_buffer_overwrites_from_the_start() {
        let mut writer = Writer::with_buffer(alloc::vec![0xaa; 6]);
        assert!(writer.capacity() >= 6);
        writer.write_uint16(0x0102);
        assert_eq!(writer.finish(), [0x02, 0x01]);
    }

    #[test]
    fn with_buffer_uses_spare_allocation() {
        let buffer = Vec::with_capacity(16);
        let writer = Writer::with_buffer(buffer);
        assert!(writer.capacity() >= 16);
        assert!(writer.is_empty());
    }

    #[test]
    fn strings_longer_than_scratch() {
        let long: String = "0123456789".repeat(300);
        let mut writer = Writer::new();
        writer.write_string(&long);
        writer.write_string("tail");
        let out = writer.finish();
        assert_eq!(&out[..3_000], long.as_bytes());
        assert_eq!(&out[3_000..], b"tail");
    }

    #[test]
    fn utf16_strings() {
        let units: Vec<u16> = "héllo".encode_utf16().collect();
        let mut writer = Writer::new();
        writer.write_string_utf16(&units);
        assert_eq!(writer.finish(), "héllo".as_bytes());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "exceeds the u32 length prefix")]
    fn oversized_length_prefix_panics() {
        let mut writer = Writer::new();
        writer.write_len(u32::MAX as usize + 1);
    }

    #[test]
    #[traced_test]
    fn growth_is_traced() {
        let mut writer = Writer::new();
        writer.write_uint32(5);
        assert!(logs_contain("growing writer buffer"));
        assert!(logs_contain("new_capacity=8"));
    }

    #[test]
    fn debug_output() {
        let mut writer = Writer::with_capacity(8);
        writer.write_string("ok");
        writer.write_uint8(0);
        insta::assert_snapshot!(
            format!("{writer:?}"),
            @r#"Writer { position: 3, capacity: 8, written: "ok\0", .. }"#
        );
    }
}
