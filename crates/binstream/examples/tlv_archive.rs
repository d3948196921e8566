//! Walks a tiny tag-length-value container to show how a generated parser
//! type drives the stream core: typed header reads, a bit-level flags field,
//! one substream per record, and post-read validation that surfaces as a
//! labelled error.
//!
//! The layout:
//!
//! ```text
//! magic      "TLV1"
//! version    u16le       (must be >= 2)
//! count      u8
//! records    count times:
//!   tag      u8
//!   flags    4 bits (msb-first), then 4 reserved bits
//!   len      u8
//!   body     len bytes, zero-terminated ASCII name + raw payload
//! ```
//!
//! Run with
//!
//! ```bash
//! cargo run -p binstream --example tlv_archive
//! ```

use binstream::{ByteStream, Endian, FormatRead, ParseError, decode_text};

#[derive(Debug)]
struct Archive {
    version: u16,
    records: Vec<Record>,
}

#[derive(Debug)]
struct Record {
    tag: u8,
    flags: u64,
    name: String,
    payload: Vec<u8>,
}

impl<'buf> FormatRead<'buf> for Archive {
    type Parent = ();
    type Root = ();

    fn read(
        io: &mut ByteStream<'buf>,
        _parent: Option<&()>,
        _root: Option<&()>,
    ) -> Result<Self, ParseError> {
        let magic = io.read_bytes(4)?;
        if magic != b"TLV1" {
            return Err(ParseError::validation_not_equal(
                format!("{:x?}", b"TLV1"),
                format!("{magic:x?}"),
                io.pos(),
                "/types/archive/seq/magic",
            ));
        }

        let version = io.read_u16(Endian::Little)?;
        if version < 2 {
            return Err(ParseError::validation_less_than(
                2,
                version,
                io.pos(),
                "/types/archive/seq/version",
            ));
        }

        let count = io.read_u8()?;
        let mut records = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            records.push(Record::read(io, None, None)?);
        }
        Ok(Self { version, records })
    }
}

impl<'buf> FormatRead<'buf> for Record {
    type Parent = ();
    type Root = ();

    fn read(
        io: &mut ByteStream<'buf>,
        _parent: Option<&()>,
        _root: Option<&()>,
    ) -> Result<Self, ParseError> {
        let tag = io.read_u8()?;
        let flags = io.read_bits_int_be(4)?;
        io.align_to_byte(); // the low nibble is reserved

        let len = usize::from(io.read_u8()?);
        let mut body = io.substream(len)?;
        let name = decode_text(body.read_bytes_term(0, false, true, true)?, "ascii")?;
        let payload = body.read_bytes_full().to_vec();

        Ok(Self {
            tag,
            flags,
            name,
            payload,
        })
    }
}

fn main() {
    let data: Vec<u8> = [
        b"TLV1".as_slice(),
        &2u16.to_le_bytes(),
        &[2], // record count
        &[0x01, 0b1010_0000, 5],
        b"cfg\x00\x2a",
        &[0x02, 0b0001_0000, 6],
        b"blob\x00\x07",
    ]
    .concat();

    match Archive::from_bytes(&data) {
        Ok(archive) => {
            println!("version {}", archive.version);
            for record in &archive.records {
                println!(
                    "  tag {:#04x} flags {:#06b} name {:?} payload {:x?}",
                    record.tag, record.flags, record.name, record.payload
                );
            }
        }
        Err(err) => eprintln!("parse failed: {err}"),
    }

    // A truncated buffer aborts the whole construction, nothing partial
    // comes back.
    let err = Archive::from_bytes(&data[..data.len() - 4]).unwrap_err();
    eprintln!("truncated parse failed as expected: {err}");
}
