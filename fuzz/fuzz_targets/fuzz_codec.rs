#![no_main]
use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use packet::{Error, Reader, Writer, WriterOptions};

#[derive(Arbitrary, Debug, Clone)]
enum Op {
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Float(f32),
    Slice(Vec<u8>),
    String(String),
    Utf16(Vec<u16>),
}

#[derive(Arbitrary, Debug)]
enum Read {
    Uint8,
    Uint16,
    Uint32,
    Int8,
    Int16,
    Int32,
    Float,
    Slice(u16),
    String(u16),
    PrefixedString,
    PrefixedSlice,
}

#[derive(Arbitrary, Debug)]
struct Input {
    initial_capacity: u8,
    scratch_capacity: u8,
    ops: Vec<Op>,
}

/// Encode `ops` with a writer, decode them with a checked reader, and demand
/// the exact values back.
fn round_trip(input: Input) {
    let mut writer = Writer::with_options(WriterOptions {
        initial_capacity: usize::from(input.initial_capacity),
        scratch_capacity: usize::from(input.scratch_capacity),
    });
    for op in &input.ops {
        match op {
            Op::Uint8(v) => writer.write_uint8(*v),
            Op::Uint16(v) => writer.write_uint16(*v),
            Op::Uint32(v) => writer.write_uint32(*v),
            Op::Int8(v) => writer.write_int8(*v),
            Op::Int16(v) => writer.write_int16(*v),
            Op::Int32(v) => writer.write_int32(*v),
            Op::Float(v) => writer.write_float(*v),
            Op::Slice(v) => writer.write_prefixed_slice(v),
            Op::String(v) => writer.write_prefixed_string(v),
            Op::Utf16(v) => {
                let len = String::from_utf16_lossy(v).len();
                writer.write_len(len);
                writer.write_string_utf16(v);
            }
        }
    }
    let bytes = writer.finish();
    assert_eq!(bytes.len(), writer.position());
    assert!(writer.capacity() >= bytes.len());

    let mut reader = Reader::new(&bytes);
    for op in &input.ops {
        match op {
            Op::Uint8(v) => assert_eq!(reader.read_uint8(), Ok(*v)),
            Op::Uint16(v) => assert_eq!(reader.read_uint16(), Ok(*v)),
            Op::Uint32(v) => assert_eq!(reader.read_uint32(), Ok(*v)),
            Op::Int8(v) => assert_eq!(reader.read_int8(), Ok(*v)),
            Op::Int16(v) => assert_eq!(reader.read_int16(), Ok(*v)),
            Op::Int32(v) => assert_eq!(reader.read_int32(), Ok(*v)),
            Op::Float(v) => assert_eq!(reader.read_float().map(f32::to_bits), Ok(v.to_bits())),
            Op::Slice(v) => assert_eq!(reader.read_prefixed_slice(), Ok(v.as_slice())),
            Op::String(v) => assert_eq!(reader.read_prefixed_string(), Ok(v.as_str())),
            Op::Utf16(v) => assert_eq!(
                reader.read_prefixed_string(),
                Ok(String::from_utf16_lossy(v).as_str())
            ),
        }
    }
    assert_eq!(reader.remaining(), 0);
}

/// Arbitrary reads over arbitrary bytes must never panic, and a failed read
/// must leave the cursor where it was.
fn hostile_reads(bytes: &[u8], reads: Vec<Read>) {
    let mut reader = Reader::new(bytes);
    for read in reads {
        let before = reader.position();
        let result = match read {
            Read::Uint8 => reader.read_uint8().map(drop),
            Read::Uint16 => reader.read_uint16().map(drop),
            Read::Uint32 => reader.read_uint32().map(drop),
            Read::Int8 => reader.read_int8().map(drop),
            Read::Int16 => reader.read_int16().map(drop),
            Read::Int32 => reader.read_int32().map(drop),
            Read::Float => reader.read_float().map(drop),
            Read::Slice(len) => reader.read_slice(usize::from(len)).map(drop),
            Read::String(len) => reader.read_string(usize::from(len)).map(drop),
            Read::PrefixedString => reader.read_prefixed_string().map(drop),
            Read::PrefixedSlice => reader.read_prefixed_slice().map(drop),
        };
        match result {
            Ok(()) => assert!(reader.position() >= before),
            Err(Error::OutOfBounds { position, len, .. }) => {
                assert!(position >= before);
                assert_eq!(len, bytes.len());
                assert_eq!(reader.position(), before);
            }
            Err(_) => assert_eq!(reader.position(), before),
        }
        assert!(reader.position() <= bytes.len());
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    if let Ok(input) = Input::arbitrary(&mut u) {
        round_trip(input);
    }

    let mut u = Unstructured::new(data);
    if let Ok(reads) = Vec::<Read>::arbitrary(&mut u) {
        hostile_reads(data, reads);
    }
});
