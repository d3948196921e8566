//! The cursor every format parser reads through.
//!
//! A [`ByteStream`] is a window over a borrowed, immutable byte buffer plus a
//! private cursor: a byte position and a leftover-bit cache for bit-level
//! reads that stop mid-byte. All typed reads funnel through a single EOF
//! gate ([`ByteStream::ensure_bytes_left`]), fail without moving the cursor,
//! and hand out zero-copy views that borrow from the buffer, never from the
//! stream itself. Carving a [`ByteStream::substream`] advances the parent
//! past the child's window at creation time, so a parent never re-observes
//! bytes a child has claimed.

use bstr::ByteSlice;

use crate::error::{ErrorKind, ParseError};

/// Byte order for multi-byte integer and float reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Order in which bit-level reads pull bits out of each byte. Tracked so a
/// mid-byte switch between the two read paths can be caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BitOrder {
    /// Each byte is consumed most-significant bit first.
    MsbFirst,
    /// Each byte is consumed least-significant bit first.
    LsbFirst,
}

/// Widest bit-level read that still yields an exact integer.
pub const MAX_BIT_WIDTH: u32 = 53;

fn low_bits(n: u32) -> u64 {
    debug_assert!(n < 64);
    (1u64 << n) - 1
}

/// A readable window over an immutable byte buffer.
///
/// Cloning forks the cursor, never the bytes: clones read the same window
/// independently. The buffer may back any number of streams at once.
#[derive(Debug, Clone)]
pub struct ByteStream<'buf> {
    bytes: &'buf [u8],
    pos: usize,
    /// Bits already pulled from the byte stream but not yet consumed.
    /// Holds fewer than 8 bits, masked to `bits_left`.
    bits: u64,
    bits_left: u32,
    bit_order: BitOrder,
}

macro_rules! read_num {
    ($($(#[$meta:meta])* $name:ident -> $ty:ty),* $(,)?) => {$(
        $(#[$meta])*
        /// # Errors
        ///
        /// [`ErrorKind::EndOfData`] if fewer bytes remain than the value
        /// needs; the position is left unchanged.
        #[inline]
        pub fn $name(&mut self, endian: Endian) -> Result<$ty, ParseError> {
            let raw = self.read_array()?;
            Ok(match endian {
                Endian::Big => <$ty>::from_be_bytes(raw),
                Endian::Little => <$ty>::from_le_bytes(raw),
            })
        }
    )*};
}

impl<'buf> ByteStream<'buf> {
    /// Wraps a whole buffer as one window, cursor at the start.
    #[must_use]
    pub fn new(bytes: &'buf [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            bits: 0,
            bits_left: 0,
            bit_order: BitOrder::MsbFirst,
        }
    }

    /// Wraps `len` bytes of `bytes` starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::EndOfData`] if the window reaches past the end of the
    /// buffer.
    pub fn windowed(bytes: &'buf [u8], offset: usize, len: usize) -> Result<Self, ParseError> {
        let window = offset
            .checked_add(len)
            .and_then(|end| bytes.get(offset..end))
            .ok_or_else(|| {
                ParseError::new(ErrorKind::EndOfData {
                    requested: offset.saturating_add(len),
                    available: bytes.len(),
                })
            })?;
        Ok(Self::new(window))
    }

    /// Window length in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Current byte position within the window.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the window end.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// True once the position has reached the window end and no leftover
    /// bits remain cached.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len() && self.bits_left == 0
    }

    /// Moves the position, clamping into `[0, size]`.
    pub fn seek(&mut self, pos: u64) {
        self.pos = usize::try_from(pos).map_or(self.bytes.len(), |p| p.min(self.bytes.len()));
    }

    /// [`seek`](Self::seek) for positions computed in floating point by
    /// format expressions. Non-finite input resets the position to the
    /// window start; negative input clamps to 0.
    pub fn seek_float(&mut self, pos: f64) {
        if pos.is_finite() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            self.seek(pos as u64);
        } else {
            self.pos = 0;
        }
    }

    /// The single EOF gate: every byte-consuming operation checks here
    /// before touching the cursor.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::EndOfData`] with the requested and available byte counts
    /// if the window cannot satisfy the read.
    pub fn ensure_bytes_left(&self, requested: usize) -> Result<(), ParseError> {
        let available = self.remaining();
        if requested > available {
            return Err(ParseError::new(ErrorKind::EndOfData {
                requested,
                available,
            }));
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
        self.ensure_bytes_left(N)?;
        let mut raw = [0u8; N];
        raw.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        Ok(raw)
    }

    /// Reads one unsigned byte.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::EndOfData`] at the window end.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads one signed byte.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::EndOfData`] at the window end.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8, ParseError> {
        Ok(i8::from_le_bytes(self.read_array::<1>()?))
    }

    read_num! {
        read_u16 -> u16,
        read_i16 -> i16,
        read_u32 -> u32,
        read_i32 -> i32,
        /// 8-byte reads return a full 64-bit value, wider than the default
        /// integer width of the 4-byte-and-under reads.
        read_u64 -> u64,
        read_i64 -> i64,
        /// IEEE-754 single precision.
        read_f32 -> f32,
        /// IEEE-754 double precision.
        read_f64 -> f64,
    }

    /// Discards the leftover-bit cache without touching the byte position.
    ///
    /// Byte-level reads do not align implicitly; formats that require strict
    /// alignment after bit-level fields call this between them.
    pub fn align_to_byte(&mut self) {
        self.bits = 0;
        self.bits_left = 0;
    }

    /// Reads `n` bits as an unsigned integer, consuming each byte
    /// most-significant bit first; earlier bits form the more-significant
    /// part of the result. With no leftover bits cached,
    /// `read_bits_int_be(8)` equals the next raw byte.
    ///
    /// Switching to the other bit order while leftover bits are cached is a
    /// precondition violation; call [`align_to_byte`](Self::align_to_byte)
    /// first.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BitWidthExceeded`] for `n > 53`, or
    /// [`ErrorKind::EndOfData`] if the underlying bytes run out. The cursor
    /// and bit cache are untouched on failure.
    pub fn read_bits_int_be(&mut self, n: u32) -> Result<u64, ParseError> {
        if n > MAX_BIT_WIDTH {
            return Err(ParseError::new(ErrorKind::BitWidthExceeded { requested: n }));
        }
        debug_assert!(
            self.bits_left == 0 || self.bit_order == BitOrder::MsbFirst,
            "bit order switched with leftover bits cached; call align_to_byte first"
        );
        self.bit_order = BitOrder::MsbFirst;

        if n <= self.bits_left {
            // Served entirely out of the cache: hand out its top `n` bits.
            let shift = self.bits_left - n;
            let res = self.bits >> shift;
            self.bits &= low_bits(shift);
            self.bits_left = shift;
            return Ok(res);
        }

        let bits_needed = n - self.bits_left;
        let bytes_needed = (bits_needed as usize).div_ceil(8);
        let mut raw = 0u64;
        for &b in self.read_bytes(bytes_needed)? {
            raw = (raw << 8) | u64::from(b);
        }

        let leftover = bytes_needed as u32 * 8 - bits_needed;
        let res = (self.bits << bits_needed) | (raw >> leftover);
        self.bits = raw & low_bits(leftover);
        self.bits_left = leftover;
        Ok(res)
    }

    /// Reads `n` bits as an unsigned integer, consuming each byte
    /// least-significant bit first; earlier bits form the less-significant
    /// part of the result.
    ///
    /// Same bit-order precondition and failure contract as
    /// [`read_bits_int_be`](Self::read_bits_int_be).
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BitWidthExceeded`] for `n > 53`, or
    /// [`ErrorKind::EndOfData`] if the underlying bytes run out.
    pub fn read_bits_int_le(&mut self, n: u32) -> Result<u64, ParseError> {
        if n > MAX_BIT_WIDTH {
            return Err(ParseError::new(ErrorKind::BitWidthExceeded { requested: n }));
        }
        debug_assert!(
            self.bits_left == 0 || self.bit_order == BitOrder::LsbFirst,
            "bit order switched with leftover bits cached; call align_to_byte first"
        );
        self.bit_order = BitOrder::LsbFirst;

        if n <= self.bits_left {
            // Served entirely out of the cache: hand out its low `n` bits.
            let res = self.bits & low_bits(n);
            self.bits >>= n;
            self.bits_left -= n;
            return Ok(res);
        }

        let bits_needed = n - self.bits_left;
        let bytes_needed = (bits_needed as usize).div_ceil(8);
        let mut raw = 0u64;
        for (i, &b) in self.read_bytes(bytes_needed)?.iter().enumerate() {
            raw |= u64::from(b) << (8 * i as u32);
        }

        let leftover = bytes_needed as u32 * 8 - bits_needed;
        let res = ((raw << self.bits_left) | self.bits) & low_bits(n);
        self.bits = raw >> bits_needed;
        self.bits_left = leftover;
        Ok(res)
    }

    /// Zero-copy view of the next `len` bytes, advancing the position.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::EndOfData`] if fewer than `len` bytes remain; the
    /// position is left unchanged.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'buf [u8], ParseError> {
        self.ensure_bytes_left(len)?;
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Zero-copy view of everything up to the window end. Always succeeds;
    /// empty at EOF.
    pub fn read_bytes_full(&mut self) -> &'buf [u8] {
        let slice = &self.bytes[self.pos..];
        self.pos = self.bytes.len();
        slice
    }

    /// Scans forward for `term` and returns the bytes before it, optionally
    /// including the terminator in the result (`include_term`) and
    /// optionally stepping the position past it (`consume_term`).
    ///
    /// When the terminator does not occur before the window end, the whole
    /// remainder is returned and the position stays put, unless `eos_error`
    /// demands a failure.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::TerminatorNotFound`] when `eos_error` is set and no
    /// terminator occurs before the window end.
    pub fn read_bytes_term(
        &mut self,
        term: u8,
        include_term: bool,
        consume_term: bool,
        eos_error: bool,
    ) -> Result<&'buf [u8], ParseError> {
        let rest = &self.bytes[self.pos..];
        match rest.find_byte(term) {
            Some(i) => {
                let out = &rest[..i + usize::from(include_term)];
                self.pos += i + usize::from(consume_term);
                Ok(out)
            }
            None if eos_error => {
                Err(ParseError::new(ErrorKind::TerminatorNotFound { terminator: term }))
            }
            None => Ok(rest),
        }
    }

    /// Carves a child stream windowed to exactly `len` bytes at the current
    /// position, advancing this stream past it immediately. The child shares
    /// the buffer but can never read beyond its window.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::EndOfData`] if fewer than `len` bytes remain.
    pub fn substream(&mut self, len: usize) -> Result<ByteStream<'buf>, ParseError> {
        let window = self.read_bytes(len)?;
        Ok(ByteStream::new(window))
    }
}
