use quickcheck::QuickCheck;

use crate::{ByteStream, ErrorKind, MAX_BIT_WIDTH};

/// Packs `(width, value)` fields into bytes, filling each byte from its
/// most-significant bit down.
fn pack_be(fields: &[(u32, u64)]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc = 0u64;
    let mut nbits = 0u32;
    for &(width, value) in fields {
        for i in (0..width).rev() {
            acc = (acc << 1) | ((value >> i) & 1);
            nbits += 1;
            if nbits == 8 {
                out.push(acc as u8);
                acc = 0;
                nbits = 0;
            }
        }
    }
    if nbits > 0 {
        out.push((acc << (8 - nbits)) as u8);
    }
    out
}

/// Packs `(width, value)` fields into bytes, filling each byte from its
/// least-significant bit up.
fn pack_le(fields: &[(u32, u64)]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc = 0u64;
    let mut nbits = 0u32;
    for &(width, value) in fields {
        for i in 0..width {
            acc |= ((value >> i) & 1) << nbits;
            nbits += 1;
            if nbits == 8 {
                out.push(acc as u8);
                acc = 0;
                nbits = 0;
            }
        }
    }
    if nbits > 0 {
        out.push(acc as u8);
    }
    out
}

#[test]
fn be_full_byte_equals_raw_byte() {
    let data = [0xa5];
    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_be(8).unwrap(), 0xa5);
    assert!(io.is_eof());
}

#[test]
fn be_split_within_one_byte() {
    let data = [0xa5]; // 0b1010_0101
    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_be(3).unwrap(), 0b101);
    assert!(!io.is_eof()); // five bits still cached
    assert_eq!(io.read_bits_int_be(5).unwrap(), 0b0_0101);
    assert!(io.is_eof());
}

#[test]
fn be_read_spans_byte_boundary() {
    let data = [0xab, 0xcd];
    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_be(12).unwrap(), 0xabc);
    assert_eq!(io.read_bits_int_be(4).unwrap(), 0xd);
}

#[test]
fn le_split_within_one_byte() {
    let data = [0xa5]; // 0b1010_0101
    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_le(3).unwrap(), 0b101);
    assert_eq!(io.read_bits_int_le(5).unwrap(), 0b1_0100);
}

#[test]
fn le_read_spans_byte_boundary() {
    let data = [0xab, 0xcd];
    let mut io = ByteStream::new(&data);
    // low 12 bits of 0xcdab
    assert_eq!(io.read_bits_int_le(12).unwrap(), 0xdab);
    assert_eq!(io.read_bits_int_le(4).unwrap(), 0xc);
}

#[test]
fn widest_supported_read() {
    let data = [0xff; 7];
    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_be(53).unwrap(), (1u64 << 53) - 1);
    assert_eq!(io.read_bits_int_be(3).unwrap(), 0b111);
    assert!(io.is_eof());

    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_le(53).unwrap(), (1u64 << 53) - 1);
    assert_eq!(io.read_bits_int_le(3).unwrap(), 0b111);
}

#[test]
fn width_above_ceiling_is_rejected() {
    let data = [0xff; 8];
    let mut io = ByteStream::new(&data);
    let err = io.read_bits_int_be(MAX_BIT_WIDTH + 1).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::BitWidthExceeded { requested: 54 });
    // the rejected call touched nothing
    assert_eq!(io.pos(), 0);
    assert_eq!(io.read_bits_int_be(8).unwrap(), 0xff);

    let mut io = ByteStream::new(&data);
    assert!(matches!(
        io.read_bits_int_le(64).unwrap_err().kind(),
        ErrorKind::BitWidthExceeded { requested: 64 }
    ));
}

#[test]
fn running_out_of_bytes_mid_bits_preserves_state() {
    let data = [0xf0];
    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_be(4).unwrap(), 0xf);

    let err = io.read_bits_int_be(8).unwrap_err();
    assert_eq!(
        *err.kind(),
        ErrorKind::EndOfData {
            requested: 1,
            available: 0
        }
    );
    // cached bits survived the failed read
    assert_eq!(io.read_bits_int_be(4).unwrap(), 0x0);
    assert!(io.is_eof());
}

#[test]
fn align_discards_leftover_bits() {
    let data = [0b1010_0000, 0x42];
    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_be(3).unwrap(), 0b101);
    io.align_to_byte();
    assert_eq!(io.read_u8().unwrap(), 0x42);
    assert!(io.is_eof());
}

#[test]
fn align_is_idempotent_on_a_fresh_stream() {
    let data = [0x12, 0x34];
    let mut io = ByteStream::new(&data);
    io.align_to_byte();
    assert_eq!(io.read_u8().unwrap(), 0x12);
}

#[test]
fn byte_reads_do_not_consume_the_bit_cache() {
    // byte-level reads proceed at the byte position; alignment is explicit
    let data = [0b1010_0000, 0x42];
    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_be(3).unwrap(), 0b101);
    assert_eq!(io.read_u8().unwrap(), 0x42);
    assert_eq!(io.read_bits_int_be(5).unwrap(), 0b0_0000);
}

#[test]
fn be_round_trip_across_arbitrary_splits() {
    fn prop(specs: Vec<(u8, u64)>) -> bool {
        let fields: Vec<(u32, u64)> = specs
            .iter()
            .map(|&(w, v)| {
                let width = 1 + u32::from(w) % MAX_BIT_WIDTH;
                (width, v & ((1u64 << width) - 1))
            })
            .collect();
        let data = pack_be(&fields);
        let mut io = ByteStream::new(&data);
        fields
            .iter()
            .all(|&(width, value)| io.read_bits_int_be(width).unwrap() == value)
    }
    QuickCheck::new().quickcheck(prop as fn(Vec<(u8, u64)>) -> bool);
}

#[test]
fn le_round_trip_across_arbitrary_splits() {
    fn prop(specs: Vec<(u8, u64)>) -> bool {
        let fields: Vec<(u32, u64)> = specs
            .iter()
            .map(|&(w, v)| {
                let width = 1 + u32::from(w) % MAX_BIT_WIDTH;
                (width, v & ((1u64 << width) - 1))
            })
            .collect();
        let data = pack_le(&fields);
        let mut io = ByteStream::new(&data);
        fields
            .iter()
            .all(|&(width, value)| io.read_bits_int_le(width).unwrap() == value)
    }
    QuickCheck::new().quickcheck(prop as fn(Vec<(u8, u64)>) -> bool);
}

#[test]
fn aligned_fields_round_trip_independently() {
    // two independent bit fields, byte-aligned between them
    let first = pack_be(&[(11, 0x5a5)]);
    let second = pack_be(&[(5, 0x15)]);
    let mut data = first;
    data.extend_from_slice(&second);

    let mut io = ByteStream::new(&data);
    assert_eq!(io.read_bits_int_be(11).unwrap(), 0x5a5);
    io.align_to_byte();
    assert_eq!(io.read_bits_int_be(5).unwrap(), 0x15);
}
