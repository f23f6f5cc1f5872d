//! Runtime cursors for a schema-driven binary wire format.
//!
//! Code generated from a schema encodes a value by driving a [`Writer`]
//! through one typed call per field, and decodes it by driving a [`Reader`]
//! through the same calls in the same order. This crate only provides those
//! primitives; it knows nothing about schemas.
//!
//! ## Wire format
//!
//! - Scalars (`u8`, `u16`, `u32`, `i8`, `i16`, `i32`, `f32`) are fixed width
//!   and little-endian.
//! - Strings and sequences carry a little-endian `u32` length prefix (UTF-8
//!   bytes for strings, elements for sequences) followed by the payload.
//! - Enums are a single byte holding the variant ordinal.
//! - Structs are their fields back to back in schema order, with no tags or
//!   padding.
//!
//! ## Quick start
//!
//! ```
//! use packet::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.write_len(2);
//! writer.write_prefixed_string("first");
//! writer.write_prefixed_string("second");
//! writer.write_float(1.0);
//! let bytes = writer.finish();
//!
//! let mut reader = Reader::new(&bytes);
//! let count = reader.read_len()?;
//! let names = (0..count)
//!     .map(|_| reader.read_prefixed_string())
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(names, ["first", "second"]);
//! assert_eq!(reader.read_float()?, 1.0);
//! # Ok::<(), packet::Error>(())
//! ```
//!
//! ## Crate layout
//! - `writer`: the growable [`Writer`] and its growth policy
//! - `reader`: [`Reader`] with the [`Checked`] and [`Unchecked`] bounds
//!   policies
//! - `scratch`: [`StringScratch`], the reusable string encode buffer, and its
//!   sizing constants
//! - `scalar`: the sealed [`Scalar`] trait for generic scalar access
//! - `options`: [`WriterOptions`]

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod options;
mod reader;
mod scalar;
mod scratch;
mod writer;

pub use error::{Error, Result};
pub use options::WriterOptions;
pub use reader::{BoundsPolicy, Checked, Reader, Unchecked, UncheckedReader};
pub use scalar::Scalar;
pub use scratch::{DEFAULT_SCRATCH_CAPACITY, MAX_UTF8_PER_UTF16_UNIT, StringScratch};
pub use writer::Writer;
