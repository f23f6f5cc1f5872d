//! Fixed-width scalar kinds and their little-endian wire codec.
//!
//! The wire format knows seven scalar kinds:
//!
//! | kind     | Rust  | width |
//! |----------|-------|-------|
//! | `uint8`  | `u8`  | 1     |
//! | `uint16` | `u16` | 2     |
//! | `uint32` | `u32` | 4     |
//! | `int8`   | `i8`  | 1     |
//! | `int16`  | `i16` | 2     |
//! | `int32`  | `i32` | 4     |
//! | `float`  | `f32` | 4     |
//!
//! Every multi-byte kind is little-endian. Generated code usually calls the
//! named methods (`write_uint16`, `read_float`, ...); generic code can use
//! [`Writer::write`](crate::Writer::write) and
//! [`Reader::read`](crate::Reader::read) with a [`Scalar`] type instead.

mod private {
    pub trait Sealed {}
}

/// A fixed-width value with a defined little-endian encoding.
///
/// This trait is sealed; the set of scalar kinds is part of the wire format.
pub trait Scalar: private::Sealed + Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Byte array holding one encoded value.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Encodes `self` in wire byte order.
    fn to_wire(self) -> Self::Bytes;

    /// Decodes a value from wire byte order.
    fn from_wire(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty => $width:literal),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl Scalar for $ty {
                const WIDTH: usize = $width;
                type Bytes = [u8; $width];

                #[inline]
                fn to_wire(self) -> Self::Bytes {
                    self.to_le_bytes()
                }

                #[inline]
                fn from_wire(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_scalar! {
    u8 => 1,
    u16 => 2,
    u32 => 4,
    i8 => 1,
    i16 => 2,
    i32 => 4,
    f32 => 4,
}
