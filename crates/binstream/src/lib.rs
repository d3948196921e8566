//! Runtime core for generated binary format parsers: a byte- and
//! bit-addressable cursor over an immutable buffer, the failure taxonomy,
//! the byte-transform utilities format definitions apply to raw fields, and
//! the minimal object contract that concrete parser types implement.
//!
//! ```rust
//! use binstream::{ByteStream, Endian};
//!
//! let data = [0x01, 0x00, 0xff, 0x41, 0x42, 0x00, 0x99];
//! let mut io = ByteStream::new(&data);
//! assert_eq!(io.read_u16(Endian::Little)?, 1);
//! assert_eq!(io.read_i8()?, -1);
//! let name = io.read_bytes_term(0, false, true, true)?;
//! assert_eq!(name, b"AB");
//! assert_eq!(io.read_bits_int_be(4)?, 0x9);
//! # Ok::<(), binstream::ParseError>(())
//! ```

#![allow(missing_docs)]

mod bytes;
mod error;
mod format;
mod stream;

#[cfg(test)]
mod tests;

pub use bytes::{
    compare_bytes, decode_text, inflate, max_of, min_of, positive_modulo, rotate_left,
    strip_trailing, truncate_at_terminator, xor_with_byte, xor_with_sequence,
};
pub use error::{ErrorKind, ParseError};
pub use format::FormatRead;
pub use stream::{ByteStream, Endian, MAX_BIT_WIDTH};
